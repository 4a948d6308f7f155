use log::warn;

use crate::rules::{contains_any, RuleSet};

const WHISK_KEYWORDS: [&str; 2] = ["powder", "collagen"];
const STIR_KEYWORDS: [&str; 2] = ["honey", "extract"];
const MUDDLE_KEYWORDS: [&str; 4] = ["berry", "berries", "fruit", "mango"];

/// Append a step for every significant ingredient the directions never use.
///
/// An ingredient counts as used when any of its content words appears in the
/// directions text as it was before this stage ran.
pub fn audit_usage(
    mut directions: Vec<String>,
    ingredients: &[String],
    rules: &RuleSet,
) -> Vec<String> {
    let combined = directions.join(" ").to_lowercase();

    for ingredient in ingredients {
        if contains_any(ingredient, &rules.audit_skip) {
            continue;
        }

        let words = significant_words(ingredient, rules);
        if words.is_empty() || words.iter().any(|w| combined.contains(w.as_str())) {
            continue;
        }

        warn!("Model forgot to use {}. Injecting step.", ingredient);
        directions.push(usage_step(ingredient));
    }

    directions
}

/// Lowercase words longer than the configured minimum, punctuation removed,
/// generic words excluded.
fn significant_words(ingredient: &str, rules: &RuleSet) -> Vec<String> {
    let clean: String = ingredient
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    clean
        .split_whitespace()
        .filter(|w| w.chars().count() > rules.audit_min_word_len)
        .filter(|w| !rules.audit_stopwords.iter().any(|s| s.to_lowercase() == *w))
        .map(str::to_string)
        .collect()
}

fn usage_step(ingredient: &str) -> String {
    let lower = ingredient.to_lowercase();
    // drop trailing notes like ", to taste"
    let name = ingredient.split(',').next().unwrap_or(ingredient).trim();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if has(&WHISK_KEYWORDS) {
        format!("Add the {} and whisk vigorously until smooth.", name)
    } else if has(&STIR_KEYWORDS) {
        format!("Stir in the {} to taste.", name)
    } else if has(&MUDDLE_KEYWORDS) {
        format!("Muddle the {} at the bottom of the glass.", name)
    } else {
        format!("Add the {} and mix gently to combine.", name)
    }
}
