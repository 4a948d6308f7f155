//! Input side of the pipeline: turn user inspiration into the ingredient
//! list and model input string.

mod constraints;
mod liquid_base;
mod normalize;

pub use constraints::inject_constraints;
pub use liquid_base::select_liquid_base;
pub use normalize::{normalize, NormalizedInput};

use crate::model::{IngredientList, Inspiration};
use crate::rules::RuleSet;

/// Prefix the fine-tuned model expects in front of the ingredient list.
pub const INPUT_PREFIX: &str = "items: ";

/// Everything the generation step needs, and what the repair step checks
/// the model's output against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    /// Constraint-injected ingredients, in order
    pub ingredients: IngredientList,
    /// Number of user entries dropped by the safety filter
    pub filtered: usize,
}

impl PreparedPrompt {
    /// Model input in the `items: a, b, c` wire format.
    pub fn model_input(&self) -> String {
        format_model_input(&self.ingredients)
    }
}

/// Normalize the inspiration and inject the domain constraints.
pub fn prepare(inspiration: &Inspiration, rules: &RuleSet) -> PreparedPrompt {
    let normalized = normalize(inspiration, rules);
    PreparedPrompt {
        ingredients: inject_constraints(normalized.ingredients, rules),
        filtered: normalized.filtered,
    }
}

pub fn format_model_input<S: AsRef<str>>(ingredients: &[S]) -> String {
    let joined = ingredients
        .iter()
        .map(|i| i.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}{}", INPUT_PREFIX, joined)
}
