use log::warn;

use crate::rules::{RuleSet, THEME};

const CLOSING_STEP: &str = "Enjoy your perfectly handcrafted matcha latte!";

/// Replace the directions wholesale if they describe baking or freezing.
///
/// Nothing the model wrote survives a trip: the replacement is built only
/// from the ingredient list.
pub fn guard_directions(
    directions: Vec<String>,
    ingredients: &[String],
    rules: &RuleSet,
) -> Vec<String> {
    match rules.banned_procedure_in(&directions.join(" ")) {
        Some(word) => {
            warn!(
                "Model hallucinated a solid food recipe ('{}')! Rewriting directions.",
                word
            );
            emergency_steps(ingredients, rules)
        }
        None => directions,
    }
}

fn is_extra_powder(ingredient: &str) -> bool {
    let lower = ingredient.to_lowercase();
    lower.contains("powder") && !lower.contains(THEME)
}

/// The fixed latte preparation used when the model's directions are unusable.
///
/// Liquid, powder and sweetener classes overlap: "coconut syrup" is both a
/// liquid and a sweetener. Only ingredients in no class (and not the theme
/// ingredient) are treated as toppings.
pub fn emergency_steps(ingredients: &[String], rules: &RuleSet) -> Vec<String> {
    let liquids: Vec<&String> = ingredients.iter().filter(|i| rules.is_liquid(i)).collect();
    let powders: Vec<&String> = ingredients.iter().filter(|i| is_extra_powder(i)).collect();
    let sweeteners: Vec<&String> = ingredients.iter().filter(|i| rules.is_sweetener(i)).collect();
    let others = ingredients.iter().filter(|i| {
        !rules.is_liquid(i)
            && !is_extra_powder(i)
            && !rules.is_sweetener(i)
            && !i.to_lowercase().contains(THEME)
    });

    let mut steps = vec![
        "Sift the matcha powder into your favorite mug to remove any lumps.".to_string(),
        "Add hot water (about 175°F) and whisk vigorously until a foamy paste forms.".to_string(),
    ];

    // powders go in with the paste, before any liquid
    for powder in powders {
        steps.push(format!("Whisk in the {} along with the matcha paste.", powder));
    }

    let milk = liquids
        .iter()
        .find(|l| l.to_lowercase().contains("milk"))
        .or_else(|| liquids.first());
    match milk {
        Some(milk) => steps.push(format!(
            "Steam or froth the {} until warm and creamy, then pour it over the matcha base.",
            milk
        )),
        None => steps.push("Steam your milk of choice and pour it over the matcha base.".to_string()),
    }

    if let Some(sweetener) = sweeteners.first() {
        steps.push(format!("Stir in the {} to sweeten to your liking.", sweetener));
    }

    for other in others {
        steps.push(format!("Top with {} or stir it in gently.", other));
    }

    steps.push(CLOSING_STEP.to_string());
    steps
}
