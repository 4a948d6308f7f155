use log::info;

use super::liquid_base::select_liquid_base;
use crate::model::IngredientList;
use crate::rules::{contains_any, RuleSet, THEME, THEME_INGREDIENT};

/// Make sure the list has a theme ingredient, a milk and a sweetener.
///
/// Checks run theme, milk, sweetener in that order so the liquid-base
/// selector sees the injected theme ingredient as context. Applying this to
/// its own output changes nothing.
pub fn inject_constraints(mut ingredients: IngredientList, rules: &RuleSet) -> IngredientList {
    if !ingredients.iter().any(|i| i.to_lowercase().contains(THEME)) {
        ingredients.push(THEME_INGREDIENT.to_string());
    }

    if !ingredients.iter().any(|i| i.to_lowercase().contains("milk")) {
        let base = select_liquid_base(&ingredients, rules);
        info!("Auto-added liquid base: {}", base);
        ingredients.push(base.as_str().to_string());
    }

    if !ingredients
        .iter()
        .any(|i| contains_any(i, &rules.sweeteners))
    {
        info!("Auto-added sweetener: {}", rules.default_sweetener);
        ingredients.push(rules.default_sweetener.clone());
    }

    ingredients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inject(items: &[&str]) -> IngredientList {
        inject_constraints(
            items.iter().map(|s| s.to_string()).collect(),
            &RuleSet::default(),
        )
    }

    fn theme_count(list: &[String]) -> usize {
        list.iter().filter(|i| i.contains(THEME)).count()
    }

    #[test]
    fn test_adds_theme_base_and_sweetener() {
        let result = inject(&["mango", "protein powder"]);
        assert_eq!(
            result,
            vec![
                "mango",
                "protein powder",
                "matcha powder",
                "coconut milk",
                "honey"
            ]
        );
    }

    #[test]
    fn test_theme_appended_exactly_once() {
        let result = inject(&["strawberry"]);
        assert_eq!(theme_count(&result), 1);
    }

    #[test]
    fn test_existing_ingredients_are_respected() {
        let result = inject(&["ceremonial matcha", "whole milk", "maple syrup"]);
        assert_eq!(result, vec!["ceremonial matcha", "whole milk", "maple syrup"]);
    }

    #[test]
    fn test_selector_sees_theme_context() {
        // only the injected theme ingredient is present, so the default base applies
        let result = inject(&[]);
        assert_eq!(result, vec!["matcha powder", "oat milk", "honey"]);
    }

    #[test]
    fn test_idempotent() {
        for input in [
            vec!["mango"],
            vec!["dark chocolate", "agave"],
            vec![],
            vec!["matcha", "soy milk"],
        ] {
            let once = inject(&input);
            let twice = inject_constraints(once.clone(), &RuleSet::default());
            assert_eq!(once, twice);
            assert_eq!(theme_count(&twice), 1);
        }
    }
}
