use log::info;

use crate::model::IngredientList;

/// Re-add input ingredients the model silently dropped.
///
/// Containment is a case-insensitive substring test, since the model tends
/// to expand entries ("milk" comes back as "1 cup oat milk").
pub fn recover_ingredients(mut parsed: IngredientList, expected: &[String]) -> IngredientList {
    for original in expected {
        let needle = original.to_lowercase();
        let present = parsed
            .iter()
            .any(|existing| existing.to_lowercase().contains(&needle));

        if !present {
            info!("Recovering dropped ingredient: {}", original);
            parsed.push(original.clone());
        }
    }

    parsed
}
