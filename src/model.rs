use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Ordered ingredient descriptions; duplicates are tolerated.
pub type IngredientList = Vec<String>;

/// Working state of the repair pipeline.
///
/// Created by the parser from raw model output; each later stage rewrites
/// exactly one field and hands the draft on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: IngredientList,
    pub directions: Vec<String>,
}

/// What the user asked for: free text or an explicit ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inspiration {
    /// Comma-separated ingredients, e.g. `"mango, protein powder"`
    Text(String),
    List(Vec<String>),
}

impl Default for Inspiration {
    fn default() -> Self {
        Inspiration::Text(String::new())
    }
}

impl From<&str> for Inspiration {
    fn from(text: &str) -> Self {
        Inspiration::Text(text.to_string())
    }
}

impl From<String> for Inspiration {
    fn from(text: String) -> Self {
        Inspiration::Text(text)
    }
}

impl From<Vec<String>> for Inspiration {
    fn from(items: Vec<String>) -> Self {
        Inspiration::List(items)
    }
}

impl From<&[&str]> for Inspiration {
    fn from(items: &[&str]) -> Self {
        Inspiration::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Upper bound accepted for the sampling temperature.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// A validated generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    inspiration: Inspiration,
    temperature: f32,
    max_length: u32,
}

impl GenerationRequest {
    pub fn new(
        inspiration: impl Into<Inspiration>,
        temperature: f32,
        max_length: u32,
    ) -> Result<Self, GenerateError> {
        if !temperature.is_finite() || temperature <= 0.0 || temperature > MAX_TEMPERATURE {
            return Err(GenerateError::InvalidRequest(format!(
                "temperature must be in (0, {}], got {}",
                MAX_TEMPERATURE, temperature
            )));
        }
        if max_length == 0 {
            return Err(GenerateError::InvalidRequest(
                "max_length must be positive".to_string(),
            ));
        }

        Ok(Self {
            inspiration: inspiration.into(),
            temperature,
            max_length,
        })
    }

    pub fn inspiration(&self) -> &Inspiration {
        &self.inspiration
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_length(&self) -> u32 {
        self.max_length
    }
}
