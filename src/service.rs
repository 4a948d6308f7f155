use log::{error, info};

use crate::builder::RecipeServiceBuilder;
use crate::config::GenerationConfig;
use crate::error::GenerateError;
use crate::generators::{DecodingParams, TextGenerator};
use crate::model::GenerationRequest;
use crate::prompt::prepare;
use crate::repair::RecipeRepairer;
use crate::rules::RuleSet;

/// The full generate-and-repair pipeline around one model.
///
/// Holds no mutable state, so one instance can serve concurrent requests
/// behind an `Arc`.
pub struct RecipeService {
    generator: Box<dyn TextGenerator>,
    repairer: RecipeRepairer,
    generation: GenerationConfig,
}

impl RecipeService {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use matchagen::RecipeService;
    ///
    /// let builder = RecipeService::builder().endpoint("http://localhost:8080");
    /// ```
    pub fn builder() -> RecipeServiceBuilder {
        RecipeServiceBuilder::default()
    }

    pub fn new(
        generator: Box<dyn TextGenerator>,
        rules: RuleSet,
        generation: GenerationConfig,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            generator,
            repairer: RecipeRepairer::new(rules)?,
            generation,
        })
    }

    pub fn generator_name(&self) -> &str {
        self.generator.generator_name()
    }

    pub fn rules(&self) -> &RuleSet {
        self.repairer.rules()
    }

    pub fn repairer(&self) -> &RecipeRepairer {
        &self.repairer
    }

    /// Generation defaults applied when a caller does not give its own.
    pub fn generation_defaults(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Generate a recipe, surfacing adapter failures.
    ///
    /// Everything after the model call is total: bad model output still
    /// yields `Ok` with either a repaired recipe or diagnostic text.
    pub async fn try_generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        let prompt = prepare(request.inspiration(), self.rules());
        let input = prompt.model_input();
        let params = DecodingParams::for_request(request, &self.generation);

        info!(
            "Generating with '{}' from {} ingredients",
            self.generator_name(),
            prompt.ingredients.len()
        );

        let raw = self
            .generator
            .generate(&input, &params)
            .await
            .map_err(|e| GenerateError::Generation(e.to_string()))?;
        info!("Raw Output: {}", raw);

        Ok(self.repairer.repair(&raw, &prompt.ingredients))
    }

    /// Generate a recipe. Never fails: adapter errors come back as
    /// `"Generation failed: <detail>"`.
    pub async fn generate(&self, request: &GenerationRequest) -> String {
        match self.try_generate(request).await {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("{}", e);
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::error::Error;
    use std::sync::Mutex;

    /// Replays a fixed output and remembers what it was asked.
    struct Scripted {
        output: Result<String, String>,
        seen: Mutex<Vec<(String, DecodingParams)>>,
    }

    impl Scripted {
        fn new(output: Result<&str, &str>) -> Self {
            Self {
                output: output.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn generator_name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            input: &str,
            params: &DecodingParams,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.seen
                .lock()
                .unwrap()
                .push((input.to_string(), params.clone()));
            self.output.clone().map_err(|e| e.into())
        }
    }

    #[tokio::test]
    async fn test_generator_receives_prepared_input() {
        let generator = std::sync::Arc::new(Scripted::new(Ok(
            "title: x <section> ingredients: mango <section> directions: blend",
        )));

        struct Shared(std::sync::Arc<Scripted>);

        #[async_trait]
        impl TextGenerator for Shared {
            fn generator_name(&self) -> &str {
                self.0.generator_name()
            }

            async fn generate(
                &self,
                input: &str,
                params: &DecodingParams,
            ) -> Result<String, Box<dyn Error + Send + Sync>> {
                self.0.generate(input, params).await
            }
        }

        let service = RecipeService::new(
            Box::new(Shared(generator.clone())),
            RuleSet::default(),
            GenerationConfig::default(),
        )
        .unwrap();

        let request = GenerationRequest::new("Mango, fish sauce", 0.7, 128).unwrap();
        service.try_generate(&request).await.unwrap();

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "items: mango, matcha powder, coconut milk, honey");
        assert_eq!(seen[0].1.temperature, 0.7);
        assert_eq!(seen[0].1.max_length, 128);
    }

    #[tokio::test]
    async fn test_adapter_failure() {
        let service = RecipeService::new(
            Box::new(Scripted::new(Err("connection refused"))),
            RuleSet::default(),
            GenerationConfig::default(),
        )
        .unwrap();
        let request = GenerationRequest::new("mango", 0.9, 256).unwrap();

        let err = service.try_generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerateError::Generation(_)));
        assert_eq!(
            service.generate(&request).await,
            "Generation failed: connection refused"
        );
    }
}
