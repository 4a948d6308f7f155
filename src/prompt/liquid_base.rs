use crate::rules::{LiquidBase, RuleSet};

/// Pick a liquid base from ingredient context.
///
/// Rules are tested in table order against the lowercase, space-joined
/// ingredient list; the first group with a keyword hit wins. The order is
/// part of the contract: tropical beats nutty beats soy beats the default.
pub fn select_liquid_base<S: AsRef<str>>(ingredients: &[S], rules: &RuleSet) -> LiquidBase {
    let context = ingredients
        .iter()
        .map(|i| i.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    rules
        .liquid_bases
        .iter()
        .find(|rule| rule.matches(&context))
        .map(|rule| rule.base)
        .unwrap_or(rules.default_liquid_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(ingredients: &[&str]) -> LiquidBase {
        select_liquid_base(ingredients, &RuleSet::default())
    }

    #[test]
    fn test_tropical_selects_coconut() {
        assert_eq!(select(&["mango"]), LiquidBase::CoconutMilk);
        assert_eq!(select(&["Passion Fruit"]), LiquidBase::CoconutMilk);
    }

    #[test]
    fn test_tropical_takes_priority_over_nutty_and_soy() {
        assert_eq!(
            select(&["dark chocolate", "tofu", "pineapple"]),
            LiquidBase::CoconutMilk
        );
        assert_eq!(select(&["cocoa nibs", "soy sauce"]), LiquidBase::AlmondMilk);
    }

    #[test]
    fn test_soy_group() {
        assert_eq!(select(&["silken tofu"]), LiquidBase::SoyMilk);
        assert_eq!(select(&["vanilla bean"]), LiquidBase::SoyMilk);
    }

    #[test]
    fn test_default_is_oat() {
        assert_eq!(select(&["strawberry", "honey"]), LiquidBase::OatMilk);
        assert_eq!(select(&[]), LiquidBase::OatMilk);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let ingredients = ["mango", "protein powder", "matcha powder"];
        let first = select(&ingredients);
        for _ in 0..10 {
            assert_eq!(select(&ingredients), first);
        }
        assert_eq!(first, LiquidBase::CoconutMilk);
    }
}
