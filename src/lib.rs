//! Matcha latte recipe generation around an unreliable seq2seq model.
//!
//! The model output is forced through a deterministic repair pipeline so
//! every recipe is a matcha latte, uses every requested ingredient and
//! never asks for an oven or an ice cream maker.
//!
//! ```
//! let raw = "title: Mango Smoothie <section> ingredients: mango \
//!            <section> directions: blend mango with ice.";
//! let expected = vec!["mango".to_string()];
//!
//! let recipe = matchagen::repair_output(raw, &expected);
//! assert!(recipe.starts_with("Title: Mango Matcha Latte"));
//! ```

pub mod builder;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generators;
pub mod model;
pub mod prompt;
pub mod repair;
pub mod rules;
pub mod server;
pub mod service;

use log::error;

pub use builder::RecipeServiceBuilder;
pub use config::AppConfig;
pub use error::{GenerateError, RepairError};
pub use generators::{DecodingParams, HttpGenerator, TextGenerator};
pub use model::{GenerationRequest, Inspiration, RecipeDraft};
pub use repair::RecipeRepairer;
pub use rules::RuleSet;
pub use service::RecipeService;

/// Generate one recipe using `matchagen.toml` and `MATCHAGEN__*` settings.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipe = matchagen::generate_recipe("mango, protein powder").await?;
/// println!("{}", recipe);
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipe(inspiration: impl Into<Inspiration>) -> Result<String, GenerateError> {
    let config = config::load_config()?;
    let request = GenerationRequest::new(
        inspiration,
        config.generation.temperature,
        config.generation.max_length,
    )?;

    let service = RecipeService::builder().config(config).build()?;
    service.try_generate(&request).await
}

/// Run only the repair pipeline over raw model text, with default rules.
///
/// `ingredients` is the list the model was prompted with (after constraint
/// injection); see [`prompt::prepare`].
pub fn repair_output(raw: &str, ingredients: &[String]) -> String {
    match RecipeRepairer::new(RuleSet::default()) {
        Ok(repairer) => repairer.repair(raw, ingredients),
        Err(e) => {
            error!("Failed to build repair patterns: {}", e);
            format!(
                "Error parsing generated recipe.\nRaw output: {}",
                repair::strip_control_tokens(raw)
            )
        }
    }
}
