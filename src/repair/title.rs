use log::info;

use super::TextPatterns;
use crate::rules::{contains_any, RuleSet, FALLBACK_TITLE, PRODUCT_WORD, THEME};

/// Bring a model title in line with the naming convention.
///
/// Rules run in a fixed order, each feeding the next:
/// 1. milkshake/smoothie/recipe become the product word
/// 2. the theme word is added when missing
/// 3. near-empty titles (two words or fewer) are rebuilt from the ingredients
/// 4. repeated theme words collapse to the first one
/// 5. the title ends in the product word
/// 6. every word is title-cased
///
/// Running it on its own output returns the same title.
pub fn normalize_title(
    original: &str,
    ingredients: &[String],
    rules: &RuleSet,
    patterns: &TextPatterns,
) -> String {
    let mut title = patterns.rename_dish_words(original).trim().to_string();
    if !title.eq_ignore_ascii_case(original.trim()) {
        info!("Enforcing {} theme: renamed '{}' to '{}'", PRODUCT_WORD, original, title);
    }

    if !title.to_lowercase().contains(THEME) {
        title = insert_theme(&title);
    }

    if dedupe_theme_words(&title).len() <= 2 {
        info!("Title too simple: '{}' - generating better one", title);
        title = synthesize_title(ingredients, rules, patterns);
    }

    let title = dedupe_theme_words(&title).join(" ");
    let title = ensure_product_suffix(&title);

    title_case(&title)
}

fn is_word(word: &str, target: &str) -> bool {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
        .eq_ignore_ascii_case(target)
}

/// Place the theme word in front of a trailing product word, or at the
/// front of the title otherwise ("Mango Latte" becomes "Mango Matcha Latte").
fn insert_theme(title: &str) -> String {
    let theme = title_case(THEME);
    let mut words: Vec<&str> = title.split_whitespace().collect();
    let ends_with_product = words
        .last()
        .map(|last| is_word(last, PRODUCT_WORD))
        .unwrap_or(false);

    if words.is_empty() {
        theme
    } else if ends_with_product {
        let at = words.len() - 1;
        words.insert(at, &theme);
        words.join(" ")
    } else {
        format!("{} {}", theme, title)
    }
}

/// Words of the title with every theme mention after the first removed.
///
/// A later mention inside a longer token is cut out of it ("Matcha-Infused"
/// keeps "Infused"). Tokens left empty, or holding only a plural or
/// possessive "s", are dropped.
fn dedupe_theme_words(title: &str) -> Vec<String> {
    let mut seen_theme = false;
    title
        .split_whitespace()
        .filter_map(|word| strip_repeated_theme(word, &mut seen_theme))
        .collect()
}

fn strip_repeated_theme(word: &str, seen_theme: &mut bool) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `word`
    let lower = word.to_ascii_lowercase();
    let mut kept = String::with_capacity(word.len());
    let mut last = 0;
    let mut removed = false;

    for (at, _) in lower.match_indices(THEME) {
        if *seen_theme {
            kept.push_str(&word[last..at]);
            last = at + THEME.len();
            removed = true;
        }
        *seen_theme = true;
    }

    if !removed {
        return Some(word.to_string());
    }
    kept.push_str(&word[last..]);

    let rest = kept.trim_matches(|c: char| c.is_ascii_punctuation());
    if rest.is_empty() || rest.eq_ignore_ascii_case("s") {
        None
    } else {
        Some(rest.to_string())
    }
}

fn synthesize_title(ingredients: &[String], rules: &RuleSet, patterns: &TextPatterns) -> String {
    let main_ingredient = ingredients
        .iter()
        .filter(|ing| !contains_any(ing, &rules.title_exclusions))
        .map(|ing| {
            let name = ing.split(',').next().unwrap_or_default().trim();
            patterns.rename_dish_words(name).trim().to_string()
        })
        .find(|name| !name.is_empty());

    match main_ingredient {
        Some(name) => format!("{} {} {}", name, title_case(THEME), PRODUCT_WORD),
        None => FALLBACK_TITLE.to_string(),
    }
}

fn ensure_product_suffix(title: &str) -> String {
    let ends_with_product = title
        .split_whitespace()
        .last()
        .map(|last| is_word(last, PRODUCT_WORD) || is_word(last, &format!("{}s", PRODUCT_WORD)))
        .unwrap_or(false);

    if ends_with_product {
        title.to_string()
    } else {
        format!("{} {}", title, PRODUCT_WORD)
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(title: &str, ingredients: &[&str]) -> String {
        let rules = RuleSet::default();
        let patterns = TextPatterns::new(&rules).unwrap();
        let ingredients: Vec<String> = ingredients.iter().map(|s| s.to_string()).collect();
        normalize_title(title, &ingredients, &rules, &patterns)
    }

    #[test]
    fn test_smoothie_becomes_themed_latte() {
        assert_eq!(
            normalize("Mango Smoothie", &["mango", "protein powder"]),
            "Mango Matcha Latte"
        );
    }

    #[test]
    fn test_milkshake_and_recipe_are_renamed() {
        assert_eq!(
            normalize("strawberry MILKSHAKE", &[]),
            "Strawberry Matcha Latte"
        );
        assert_eq!(
            normalize("Easy Iced Matcha Recipe", &[]),
            "Easy Iced Matcha Latte"
        );
    }

    #[test]
    fn test_short_title_rebuilt_from_first_suitable_ingredient() {
        assert_eq!(
            normalize("matcha", &["matcha powder", "oat milk", "ice", "dried lavender", "honey"]),
            "Dried Lavender Matcha Latte"
        );
    }

    #[test]
    fn test_short_title_without_suitable_ingredient_uses_fallback() {
        assert_eq!(
            normalize("Matcha Recipe", &["matcha powder", "whole milk", "hot water"]),
            FALLBACK_TITLE
        );
    }

    #[test]
    fn test_ingredient_name_stops_at_comma() {
        assert_eq!(
            normalize("Latte", &["raw honey, to taste"]),
            "Raw Honey Matcha Latte"
        );
    }

    #[test]
    fn test_duplicate_theme_words_collapse_to_first() {
        assert_eq!(
            normalize("matcha Matcha Vanilla Cloud Latte", &[]),
            "Matcha Vanilla Cloud Latte"
        );
        assert_eq!(
            normalize("Matcha Honey Matcha Latte", &[]),
            "Matcha Honey Latte"
        );
    }

    #[test]
    fn test_embedded_theme_mentions_are_cut_out() {
        assert_eq!(
            normalize("Matcha Latte with Matcha-Infused Cream", &["cream"]),
            "Matcha Latte With Infused Cream Latte"
        );
        assert_eq!(
            normalize("Matcha Vanilla Honey Matchas", &[]),
            "Matcha Vanilla Honey Latte"
        );
        assert_eq!(
            normalize("Iced Matcha-Matcha Cloud Latte", &[]),
            "Iced Matcha Cloud Latte"
        );
        // nothing but the possessive is left, so the title is too short
        assert_eq!(normalize("Matcha's Best MATCHAS", &[]), "Signature Matcha Latte");
    }

    #[test]
    fn test_duplicate_collapse_does_not_leave_short_title() {
        assert_eq!(
            normalize("Matcha Matcha Latte", &["blueberries"]),
            "Blueberries Matcha Latte"
        );
    }

    #[test]
    fn test_output_invariants() {
        for (title, ingredients) in [
            ("Mango Smoothie", vec!["mango"]),
            ("", vec![]),
            ("RECIPE", vec!["smoothie mix"]),
            ("Best Matcha Matcha Milkshake Recipe", vec!["vanilla"]),
            ("Cold Brew Green Tea", vec!["ice"]),
            ("Matcha Latte with Matcha-Infused Cream", vec!["cream"]),
            ("Matcha's Best MATCHAS", vec![]),
            ("matchamatcha swirl cloud", vec![]),
        ] {
            let result = normalize(title, &ingredients);
            let lower = result.to_lowercase();
            assert_eq!(lower.matches(THEME).count(), 1, "{result}");
            assert!(!lower.contains("recipe"), "{result}");
            assert!(!lower.contains("smoothie"), "{result}");
            assert!(!lower.contains("milkshake"), "{result}");
            assert!(result.ends_with(PRODUCT_WORD), "{result}");
        }
    }

    #[test]
    fn test_idempotent() {
        let ingredients = ["mango", "matcha powder", "coconut milk", "honey"];
        for title in [
            "Mango Smoothie",
            "matcha",
            "Matcha Matcha Latte",
            "Strawberry Milkshake Recipe",
            "Matcha Latte with Matcha-Infused Cream",
            "a tropical green drink",
            "",
        ] {
            let once = normalize(title, &ingredients);
            let twice = normalize(&once, &ingredients);
            assert_eq!(once, twice, "not stable for {title:?}");
        }
    }
}
