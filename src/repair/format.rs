use std::fmt::Write;

use super::TextPatterns;
use crate::error::RepairError;
use crate::model::RecipeDraft;

const TITLE_LABEL: &str = "Title:";
const INGREDIENTS_LABEL: &str = "Ingredients:";
const DIRECTIONS_LABEL: &str = "Directions:";

/// Render the final recipe text.
///
/// ```text
/// Title: Mango Matcha Latte
///
/// Ingredients:
/// - Mango
///
/// Directions:
/// 1. Blend mango with ice.
/// ```
pub fn format_recipe(draft: &RecipeDraft, patterns: &TextPatterns) -> Result<String, RepairError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(RepairError::EmptyTitle);
    }

    let mut output = String::new();
    writeln!(output, "{} {}", TITLE_LABEL, title)?;
    writeln!(output)?;

    writeln!(output, "{}", INGREDIENTS_LABEL)?;
    for ingredient in draft.ingredients.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
        writeln!(output, "- {}", capitalize(ingredient))?;
    }
    writeln!(output)?;

    write!(output, "{}", DIRECTIONS_LABEL)?;
    let steps = draft
        .directions
        .iter()
        .map(|d| clean_direction(d, patterns))
        .filter(|d| !d.is_empty());
    for (number, step) in steps.enumerate() {
        write!(output, "\n{}. {}", number + 1, step)?;
    }

    Ok(output)
}

/// Strip model-side numbering, join split time ranges ("7 10 minutes" to
/// "7-10 minutes") and capitalize.
pub fn clean_direction(direction: &str, patterns: &TextPatterns) -> String {
    let unnumbered = patterns.strip_enumeration(direction.trim());
    let fixed = patterns.join_time_ranges(unnumbered.trim());
    capitalize(&fixed)
}

/// Uppercase the first character and leave the rest alone.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Read formatted recipe text back into a draft.
///
/// Only understands the layout [`format_recipe`] produces.
pub fn parse_formatted(text: &str) -> RecipeDraft {
    #[derive(PartialEq)]
    enum Section {
        Preamble,
        Ingredients,
        Directions,
    }

    let mut draft = RecipeDraft::default();
    let mut section = Section::Preamble;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(title) = line.strip_prefix(TITLE_LABEL) {
            draft.title = title.trim().to_string();
        } else if line == INGREDIENTS_LABEL {
            section = Section::Ingredients;
        } else if line == DIRECTIONS_LABEL {
            section = Section::Directions;
        } else if section == Section::Ingredients {
            if let Some(item) = line.strip_prefix('-') {
                draft.ingredients.push(item.trim().to_string());
            }
        } else if section == Section::Directions {
            if let Some((number, step)) = line.split_once(". ") {
                if number.chars().all(|c| c.is_ascii_digit()) {
                    draft.directions.push(step.trim().to_string());
                }
            }
        }
    }

    draft
}
