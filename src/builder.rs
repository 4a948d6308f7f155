use std::time::Duration;

use crate::config::AppConfig;
use crate::generators::{HttpGenerator, TextGenerator};
use crate::rules::RuleSet;
use crate::{GenerateError, RecipeService};

/// Builder for configuring a [`RecipeService`]
#[derive(Default)]
pub struct RecipeServiceBuilder {
    config: Option<AppConfig>,
    generator: Option<Box<dyn TextGenerator>>,
    endpoint: Option<String>,
    api_key: Option<String>,
    rules: Option<RuleSet>,
    timeout: Option<Duration>,
}

impl RecipeServiceBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use matchagen::{AppConfig, RecipeService};
    ///
    /// let builder = RecipeService::builder().config(AppConfig::default());
    /// ```
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom model backend
    ///
    /// Takes precedence over `.endpoint()` and the `[model]` config section.
    pub fn generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the inference server base URL
    ///
    /// # Example
    /// ```
    /// use matchagen::RecipeService;
    ///
    /// let builder = RecipeService::builder().endpoint("http://localhost:8080");
    /// ```
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Set the bearer token sent to the inference server
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the keyword tables driving the pipeline
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set a timeout for inference requests
    ///
    /// # Example
    /// ```
    /// use matchagen::RecipeService;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeService::builder()
    ///     .endpoint("http://localhost:8080")
    ///     .timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the service
    ///
    /// # Errors
    /// Returns `GenerateError` if:
    /// - Neither a generator nor an endpoint was given
    /// - The HTTP client cannot be created
    /// - A rule table produces an invalid pattern
    pub fn build(self) -> Result<RecipeService, GenerateError> {
        let config = self.config.unwrap_or_default();
        let rules = self.rules.unwrap_or(config.rules);

        let generator = match self.generator {
            Some(generator) => generator,
            None => {
                let mut model = config.model;
                if let Some(endpoint) = self.endpoint {
                    model.endpoint = Some(endpoint);
                }
                if let Some(key) = self.api_key {
                    model.api_key = Some(key);
                }
                if let Some(timeout) = self.timeout {
                    model.timeout = timeout.as_secs().max(1);
                }

                if model.endpoint.is_none() {
                    return Err(GenerateError::BuilderError(
                        "No model endpoint configured. Use .endpoint() or .generator()"
                            .to_string(),
                    ));
                }

                let generator = HttpGenerator::new(&model).map_err(|e| {
                    GenerateError::BuilderError(format!("Failed to create generator: {}", e))
                })?;
                Box::new(generator)
            }
        };

        RecipeService::new(generator, rules, config.generation)
    }
}
