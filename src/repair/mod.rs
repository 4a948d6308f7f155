//! Output side of the pipeline: parse raw model text and force it into a
//! well-formed recipe that satisfies the domain constraints.

mod audit;
mod format;
mod guard;
mod parser;
mod recovery;
mod title;

pub use audit::audit_usage;
pub use format::{capitalize, clean_direction, format_recipe, parse_formatted};
pub use guard::{emergency_steps, guard_directions};
pub use parser::{
    lex, parse, strip_control_tokens, ParseOutcome, Token, CONTROL_TOKENS, ITEM_SEPARATOR,
    SECTION_MARKER,
};
pub use recovery::recover_ingredients;
pub use title::normalize_title;

use std::borrow::Cow;

use log::{error, warn};
use regex::{NoExpand, Regex, RegexBuilder};

use crate::error::RepairError;
use crate::model::RecipeDraft;
use crate::rules::{RuleSet, PRODUCT_WORD};

/// Regexes the repair stages share, compiled once per rule set.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    dish_words: Option<Regex>,
    leading_enumeration: Regex,
    time_range: Regex,
}

impl TextPatterns {
    pub fn new(rules: &RuleSet) -> Result<Self, regex::Error> {
        let dish_words = if rules.renamed_dish_words.is_empty() {
            None
        } else {
            let alternation = rules
                .renamed_dish_words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self {
            dish_words,
            leading_enumeration: Regex::new(r"^\s*\d+[.)]\s*")?,
            time_range: Regex::new(r"(\d+)\s+(\d+)\s*(min|hour)")?,
        })
    }

    pub fn rename_dish_words(&self, text: &str) -> String {
        match &self.dish_words {
            Some(re) => re.replace_all(text, NoExpand(PRODUCT_WORD)).into_owned(),
            None => text.to_string(),
        }
    }

    fn strip_enumeration<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.leading_enumeration.replace(text, "")
    }

    fn join_time_ranges<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.time_range.replace_all(text, "$1-$2 $3")
    }
}

/// Runs every repair stage with one read-only rule set.
#[derive(Debug, Clone)]
pub struct RecipeRepairer {
    rules: RuleSet,
    patterns: TextPatterns,
}

impl RecipeRepairer {
    pub fn new(rules: RuleSet) -> Result<Self, regex::Error> {
        let patterns = TextPatterns::new(&rules)?;
        Ok(Self { rules, patterns })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Turn raw model output into the final recipe text. Never fails.
    ///
    /// `expected` is the constraint-injected ingredient list the model was
    /// prompted with. Unparseable output comes back unchanged apart from
    /// control-token removal; a failure in a later stage comes back as a
    /// diagnostic embedding the raw text.
    pub fn repair(&self, raw: &str, expected: &[String]) -> String {
        match parse(raw) {
            ParseOutcome::Unparseable(text) => {
                warn!("Standard parsing failed, returning raw text");
                text
            }
            ParseOutcome::Parsed(draft) => match self.repair_draft(draft, expected) {
                Ok(recipe) => recipe,
                Err(e) => {
                    error!("Error parsing/formatting recipe: {:?}", e);
                    format!(
                        "Error parsing generated recipe.\nRaw output: {}",
                        strip_control_tokens(raw)
                    )
                }
            },
        }
    }

    /// Recovery, title, guard, audit and formatting, in that order.
    pub fn repair_draft(
        &self,
        draft: RecipeDraft,
        expected: &[String],
    ) -> Result<String, RepairError> {
        let RecipeDraft {
            title,
            ingredients,
            directions,
        } = draft;

        let ingredients = recover_ingredients(ingredients, expected);
        let title = normalize_title(&title, &ingredients, &self.rules, &self.patterns);
        let directions = guard_directions(directions, &ingredients, &self.rules);
        let directions = audit_usage(directions, &ingredients, &self.rules);

        format_recipe(
            &RecipeDraft {
                title,
                ingredients,
                directions,
            },
            &self.patterns,
        )
    }
}
