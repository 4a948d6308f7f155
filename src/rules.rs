use serde::Deserialize;

/// The word every generated recipe is themed around.
pub const THEME: &str = "matcha";

/// Canonical dish word every title ends with.
pub const PRODUCT_WORD: &str = "Latte";

/// Ingredient appended when the input has no theme ingredient.
pub const THEME_INGREDIENT: &str = "matcha powder";

/// Title used when the model gives us nothing to work with.
pub const DEFAULT_TITLE: &str = "Matcha Recipe";

/// Title used when no ingredient is suitable for naming the drink.
pub const FALLBACK_TITLE: &str = "Signature Matcha Latte";

/// Non-dairy bases the selector can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidBase {
    CoconutMilk,
    AlmondMilk,
    SoyMilk,
    OatMilk,
}

impl LiquidBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiquidBase::CoconutMilk => "coconut milk",
            LiquidBase::AlmondMilk => "almond milk",
            LiquidBase::SoyMilk => "soy milk",
            LiquidBase::OatMilk => "oat milk",
        }
    }
}

impl std::fmt::Display for LiquidBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the liquid-base table: any keyword hit selects `base`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiquidBaseRule {
    pub keywords: Vec<String>,
    pub base: LiquidBase,
}

impl LiquidBaseRule {
    fn new(keywords: &[&str], base: LiquidBase) -> Self {
        Self {
            keywords: strings(keywords),
            base,
        }
    }

    pub fn matches(&self, context: &str) -> bool {
        contains_any(context, &self.keywords)
    }
}

/// Static keyword tables that drive every stage of the pipeline.
///
/// Built once (from defaults, optionally overridden by the `[rules]` config
/// section) and only ever borrowed afterwards. All matching against these
/// lists is case-insensitive substring containment, so overrides may be
/// written in any case.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Ingredients that never belong in a latte; matching entries are dropped.
    pub forbidden_ingredients: Vec<String>,
    /// Solid-food and frozen-dessert vocabulary the guard rejects.
    pub banned_procedures: Vec<String>,
    /// Evaluated in order, first match wins.
    pub liquid_bases: Vec<LiquidBaseRule>,
    pub default_liquid_base: LiquidBase,
    pub sweeteners: Vec<String>,
    pub default_sweetener: String,
    /// Words the title normalizer rewrites to the product word.
    pub renamed_dish_words: Vec<String>,
    /// Ingredients containing these never name the drink.
    pub title_exclusions: Vec<String>,
    /// Keywords that classify an ingredient as a liquid in the emergency steps.
    pub liquid_keywords: Vec<String>,
    /// Ingredients treated as implicitly used by any direction text.
    pub audit_skip: Vec<String>,
    /// Words too generic to prove an ingredient was used.
    pub audit_stopwords: Vec<String>,
    /// Minimum length (exclusive) of a word that counts as significant.
    pub audit_min_word_len: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            forbidden_ingredients: strings(&[
                "chicken", "onion", "garlic", "beef", "pork", "fish", "oil", "salt", "pepper",
                "soup", "broth",
            ]),
            banned_procedures: strings(&[
                "oven",
                "bake",
                "baking",
                "preheat",
                "churn",
                "ice cream maker",
                "freezer",
                "loaf",
                "pan",
                "gelato",
                "ice bath",
            ]),
            liquid_bases: vec![
                LiquidBaseRule::new(
                    &["mango", "pineapple", "coconut", "tropical", "passion"],
                    LiquidBase::CoconutMilk,
                ),
                LiquidBaseRule::new(
                    &["almond", "nut", "chocolate", "cocoa", "cacao"],
                    LiquidBase::AlmondMilk,
                ),
                LiquidBaseRule::new(&["soy", "bean", "tofu"], LiquidBase::SoyMilk),
            ],
            default_liquid_base: LiquidBase::OatMilk,
            sweeteners: strings(&["syrup", "honey", "sugar", "agave"]),
            default_sweetener: "honey".to_string(),
            renamed_dish_words: strings(&["milkshake", "smoothie", "recipe"]),
            title_exclusions: strings(&[THEME, "milk", "water", "ice"]),
            liquid_keywords: strings(&["milk", "water", "soy", "oat", "almond", "coconut"]),
            audit_skip: strings(&[THEME, "water", "ice", "sugar", "syrup", "milk"]),
            audit_stopwords: strings(&["powder", "extract"]),
            audit_min_word_len: 3,
        }
    }
}

impl RuleSet {
    pub fn is_forbidden(&self, ingredient: &str) -> bool {
        contains_any(ingredient, &self.forbidden_ingredients)
    }

    pub fn is_sweetener(&self, ingredient: &str) -> bool {
        contains_any(ingredient, &self.sweeteners)
    }

    pub fn is_liquid(&self, ingredient: &str) -> bool {
        contains_any(ingredient, &self.liquid_keywords)
    }

    /// First banned procedure found in `text`, if any.
    pub fn banned_procedure_in<'a>(&'a self, text: &str) -> Option<&'a str> {
        let lower = text.to_lowercase();
        self.banned_procedures
            .iter()
            .find(|word| lower.contains(&word.to_lowercase()))
            .map(String::as_str)
    }
}

/// Case-insensitive substring test against a keyword list.
pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(&n.to_lowercase()))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquid_base_names() {
        assert_eq!(LiquidBase::CoconutMilk.as_str(), "coconut milk");
        assert_eq!(LiquidBase::OatMilk.to_string(), "oat milk");
    }

    #[test]
    fn test_forbidden_is_case_insensitive() {
        let rules = RuleSet::default();
        assert!(rules.is_forbidden("Roast CHICKEN"));
        assert!(rules.is_forbidden("olive oil"));
        assert!(!rules.is_forbidden("strawberries"));
    }

    #[test]
    fn test_banned_procedure_lookup() {
        let rules = RuleSet::default();
        assert_eq!(
            rules.banned_procedure_in("Preheat the OVEN to 350"),
            Some("oven")
        );
        assert_eq!(rules.banned_procedure_in("Whisk until frothy."), None);
    }

    #[test]
    fn test_rules_deserialize_with_partial_override() {
        let rules: RuleSet = serde_json::from_str(
            r#"{"default_sweetener": "maple syrup", "liquid_bases": [{"keywords": ["rice"], "base": "soy_milk"}]}"#,
        )
        .unwrap();

        assert_eq!(rules.default_sweetener, "maple syrup");
        assert_eq!(rules.liquid_bases.len(), 1);
        assert_eq!(rules.liquid_bases[0].base, LiquidBase::SoyMilk);
        // untouched tables keep their defaults
        assert!(rules.banned_procedures.contains(&"preheat".to_string()));
    }

    #[test]
    fn test_mixed_case_overrides_still_match() {
        let rules: RuleSet = serde_json::from_str(
            r#"{
                "forbidden_ingredients": ["Chicken"],
                "banned_procedures": ["Grill"],
                "sweeteners": ["Maple"],
                "liquid_keywords": ["RICE"],
                "liquid_bases": [{"keywords": ["Rice"], "base": "soy_milk"}]
            }"#,
        )
        .unwrap();

        assert!(rules.is_forbidden("roast chicken"));
        assert_eq!(rules.banned_procedure_in("grill the toast"), Some("Grill"));
        assert!(rules.is_sweetener("maple syrup"));
        assert!(rules.is_liquid("rice milk"));
        assert!(rules.liquid_bases[0].matches("brown rice"));
    }
}
