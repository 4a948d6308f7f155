use log::warn;

use crate::model::{IngredientList, Inspiration};
use crate::rules::RuleSet;

/// Cleaned user input plus how many entries the safety filter removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInput {
    pub ingredients: IngredientList,
    pub filtered: usize,
}

/// Lowercase, trim and drop empty entries, then remove anything on the
/// forbidden list. Never fails; garbage input yields an empty list.
pub fn normalize(inspiration: &Inspiration, rules: &RuleSet) -> NormalizedInput {
    let raw: Vec<String> = match inspiration {
        Inspiration::Text(text) => text.split(',').filter_map(clean_entry).collect(),
        Inspiration::List(items) => items.iter().filter_map(|i| clean_entry(i)).collect(),
    };

    let total = raw.len();
    let ingredients: IngredientList = raw
        .into_iter()
        .filter(|ingredient| !rules.is_forbidden(ingredient))
        .collect();

    let filtered = total - ingredients.len();
    if filtered > 0 {
        warn!("Filtered out {} unsafe ingredients", filtered);
    }

    NormalizedInput {
        ingredients,
        filtered,
    }
}

fn clean_entry(entry: &str) -> Option<String> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
