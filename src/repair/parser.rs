//! Parser for the tagged text the recipe model emits:
//!
//! ```text
//! title: T <section> ingredients: a <sep> b <section> directions: s1 <sep> s2
//! ```

use crate::model::RecipeDraft;
use crate::rules::DEFAULT_TITLE;

pub const SECTION_MARKER: &str = "<section>";
pub const ITEM_SEPARATOR: &str = "<sep>";

/// Tokenizer artifacts the model leaks into decoded text.
pub const CONTROL_TOKENS: [&str; 3] = ["</s>", "<pad>", "<s>"];

const TITLE_PREFIX: &str = "title:";
const INGREDIENTS_PREFIX: &str = "ingredients:";
const DIRECTIONS_PREFIX: &str = "directions:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Section,
    Separator,
    Text(&'a str),
}

/// Result of parsing raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(RecipeDraft),
    /// Neither ingredients nor directions were found. Holds the cleaned
    /// text, which callers return as-is instead of repairing it.
    Unparseable(String),
}

pub fn strip_control_tokens(raw: &str) -> String {
    CONTROL_TOKENS
        .iter()
        .fold(raw.to_string(), |text, token| text.replace(token, ""))
        .trim()
        .to_string()
}

/// Split text into markers and the literal text between them.
///
/// Only the exact `<section>` and `<sep>` tags are markers; any other
/// angle-bracket text (`<separator>`, `<b>`, a stray `<`) stays literal.
pub fn lex(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let at = cursor + offset;
        let rest = &text[at..];

        let marker = if rest.starts_with(SECTION_MARKER) {
            Some((Token::Section, SECTION_MARKER.len()))
        } else if rest.starts_with(ITEM_SEPARATOR) {
            Some((Token::Separator, ITEM_SEPARATOR.len()))
        } else {
            None
        };

        match marker {
            Some((token, len)) => {
                if at > text_start {
                    tokens.push(Token::Text(&text[text_start..at]));
                }
                tokens.push(token);
                cursor = at + len;
                text_start = cursor;
            }
            None => cursor = at + 1,
        }
    }

    if text_start < text.len() {
        tokens.push(Token::Text(&text[text_start..]));
    }

    tokens
}

/// Group tokens into sections, each a list of raw items.
fn sections(tokens: &[Token<'_>]) -> Vec<Vec<String>> {
    let mut sections = Vec::new();
    let mut items = Vec::new();
    let mut item = String::new();

    for token in tokens {
        match token {
            Token::Text(text) => item.push_str(text),
            Token::Separator => items.push(std::mem::take(&mut item)),
            Token::Section => {
                items.push(std::mem::take(&mut item));
                sections.push(std::mem::take(&mut items));
            }
        }
    }
    items.push(item);
    sections.push(items);

    sections
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

fn clean_items(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Parse raw model output into a draft.
///
/// Tolerant of missing sections: they default to empty, and a missing title
/// becomes the generic default. Only output with neither ingredients nor
/// directions is reported as unparseable.
pub fn parse(raw: &str) -> ParseOutcome {
    let text = strip_control_tokens(raw);
    let tokens = lex(&text);

    let mut title: Option<String> = None;
    let mut ingredients = Vec::new();
    let mut directions = Vec::new();

    for mut items in sections(&tokens) {
        let Some(first) = items.first_mut() else {
            continue;
        };
        let head = first.trim_start().to_string();

        if let Some(rest) = strip_prefix_ignore_case(&head, TITLE_PREFIX) {
            *first = rest.to_string();
            let joined = clean_items(items).join(" ");
            title = Some(joined).filter(|t| !t.is_empty());
        } else if let Some(rest) = strip_prefix_ignore_case(&head, INGREDIENTS_PREFIX) {
            *first = rest.to_string();
            ingredients = clean_items(items);
        } else if let Some(rest) = strip_prefix_ignore_case(&head, DIRECTIONS_PREFIX) {
            *first = rest.to_string();
            directions = clean_items(items);
        }
    }

    if ingredients.is_empty() && directions.is_empty() {
        return ParseOutcome::Unparseable(text);
    }

    ParseOutcome::Parsed(RecipeDraft {
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        ingredients,
        directions,
    })
}
