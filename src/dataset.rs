//! Training-data tooling: read the plain-text recipe corpus and turn it into
//! seq2seq input/target pairs in the same tag protocol the model emits.

use log::{info, warn};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::prompt::format_model_input;
use crate::repair::{ITEM_SEPARATOR, SECTION_MARKER};

const RECORD_SEPARATOR: &str = "---";

/// One recipe from the training corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub directions: Vec<String>,
}

/// A model input and the output it should learn to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingPair {
    pub input: String,
    pub target: String,
}

impl TrainingRecipe {
    /// ```
    /// use matchagen::dataset::TrainingRecipe;
    ///
    /// let recipe = TrainingRecipe {
    ///     title: "Iced Latte".to_string(),
    ///     ingredients: vec!["matcha".to_string(), "milk".to_string()],
    ///     directions: vec!["Whisk.".to_string(), "Pour.".to_string()],
    /// };
    /// let pair = recipe.to_training_pair();
    /// assert_eq!(pair.input, "items: matcha, milk");
    /// assert_eq!(
    ///     pair.target,
    ///     "title: Iced Latte <section> ingredients: matcha <sep> milk \
    ///      <section> directions: Whisk. <sep> Pour."
    /// );
    /// ```
    pub fn to_training_pair(&self) -> TrainingPair {
        let sep = format!(" {} ", ITEM_SEPARATOR);
        let target = format!(
            "title: {title} {section} ingredients: {ingredients} {section} directions: {directions}",
            title = self.title,
            section = SECTION_MARKER,
            ingredients = self.ingredients.join(&sep),
            directions = self.directions.join(&sep),
        );

        TrainingPair {
            input: format_model_input(&self.ingredients),
            target,
        }
    }

    /// Serialize back into the corpus record format.
    pub fn to_record(&self) -> String {
        let mut record = format!("{}\n\nIngredients:\n", self.title);
        for ingredient in &self.ingredients {
            record.push_str(&format!("- {}\n", ingredient));
        }
        record.push_str("\nInstructions:\n");
        for (i, step) in self.directions.iter().enumerate() {
            record.push_str(&format!("{}. {}\n", i + 1, step));
        }
        record.push_str("\n---\n\n");
        record
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    Preamble,
    Ingredients,
    Directions,
}

/// Parse every `---`-separated record in `text`.
///
/// Records without a title, ingredients or directions are skipped.
pub fn load_recipes(text: &str) -> Vec<TrainingRecipe> {
    let mut recipes = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim() == RECORD_SEPARATOR {
            push_record(&current, &mut recipes);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_record(&current, &mut recipes);

    info!("Loaded {} training recipes", recipes.len());
    recipes
}

fn push_record(lines: &[&str], recipes: &mut Vec<TrainingRecipe>) {
    if lines.iter().all(|l| l.trim().is_empty()) {
        return;
    }

    match parse_record(lines) {
        Some(recipe) => recipes.push(recipe),
        None => {
            let first = lines.iter().map(|l| l.trim()).find(|l| !l.is_empty());
            warn!("Skipping incomplete recipe record: {:?}", first.unwrap_or_default());
        }
    }
}

fn parse_record(lines: &[&str]) -> Option<TrainingRecipe> {
    let mut recipe = TrainingRecipe::default();
    let mut block = Block::Preamble;

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let header = line.to_lowercase();
        match header.as_str() {
            "ingredients:" => block = Block::Ingredients,
            "instructions:" | "directions:" => block = Block::Directions,
            _ => match block {
                Block::Preamble if recipe.title.is_empty() => recipe.title = line.to_string(),
                Block::Preamble => {}
                Block::Ingredients => push_item(&mut recipe.ingredients, line),
                Block::Directions => push_item(&mut recipe.directions, line),
            },
        }
    }

    let complete = !recipe.title.is_empty()
        && !recipe.ingredients.is_empty()
        && !recipe.directions.is_empty();
    complete.then_some(recipe)
}

fn push_item(items: &mut Vec<String>, line: &str) {
    let item = strip_list_marker(line);
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

/// Drop a leading `-`, `*`, `•` or `N.` / `N)` marker.
fn strip_list_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix(|c: char| matches!(c, '-' | '*' | '•')) {
        return rest.trim_start();
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(|c: char| c == '.' || c == ')') {
            return rest.trim_start();
        }
    }
    line
}

/// One JSON object per line, in corpus order.
pub fn to_jsonl(recipes: &[TrainingRecipe]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for recipe in recipes {
        out.push_str(&serde_json::to_string(&recipe.to_training_pair())?);
        out.push('\n');
    }
    Ok(out)
}

// Longer phrases come first so they win over their prefixes.
const BRAND_REPLACEMENTS: [(&str, &str); 12] = [
    (r"Jade Leaf Teahouse Ceremonial Matcha", "ceremonial matcha"),
    (r"Jade Leaf Ceremonial Matcha", "ceremonial matcha"),
    (r"Jade Leaf matcha powder", "matcha powder"),
    (r"Jade Leaf matcha", "matcha"),
    (r"Jade Leaf", ""),
    (r"\bDoMatcha\b", "matcha"),
    (r"\bMizuba\b", "matcha"),
    (r"\bEncha\b", "matcha"),
    (r"\bPique\b", "matcha"),
    (r"brand(?:ed)?\s+matcha", "matcha"),
    (r"premium grade matcha", "matcha"),
    (r"culinary grade matcha", "matcha"),
];

/// Removes vendor names from corpus text so the model never learns them.
#[derive(Debug, Clone)]
pub struct BrandScrubber {
    replacements: Vec<(Regex, &'static str)>,
    spaces: Regex,
}

impl BrandScrubber {
    pub fn new() -> Result<Self, regex::Error> {
        let replacements = BRAND_REPLACEMENTS
            .iter()
            .map(|(pattern, replacement)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, *replacement))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            replacements,
            spaces: Regex::new(r"[ \t]+")?,
        })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for (re, replacement) in &self.replacements {
            cleaned = re.replace_all(&cleaned, *replacement).into_owned();
        }

        cleaned
            .lines()
            .map(|line| self.spaces.replace_all(line, " ").trim_end().to_string())
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && trimmed != "-" && trimmed != ","
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One-shot helper around [`BrandScrubber`].
pub fn clean_text(text: &str) -> Result<String, regex::Error> {
    Ok(BrandScrubber::new()?.clean(text))
}
