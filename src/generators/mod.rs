mod http;

pub use http::HttpGenerator;

use async_trait::async_trait;
use std::error::Error;

use crate::config::GenerationConfig;
use crate::model::GenerationRequest;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingParams {
    pub temperature: f32,
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
    pub top_k: u32,
    pub top_p: f32,
    pub repetition_penalty: f32,
    pub no_repeat_ngram_size: u32,
    pub num_return_sequences: u32,
}

impl DecodingParams {
    /// Per-request temperature and length on top of the configured defaults.
    ///
    /// `min_length` is capped at `max_length` so short requests stay valid.
    pub fn for_request(request: &GenerationRequest, defaults: &GenerationConfig) -> Self {
        Self {
            temperature: request.temperature(),
            max_length: request.max_length(),
            min_length: defaults.min_length.min(request.max_length()),
            ..Self::from(defaults)
        }
    }
}

impl From<&GenerationConfig> for DecodingParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_length: config.max_length,
            min_length: config.min_length.min(config.max_length),
            do_sample: true,
            top_k: config.top_k,
            top_p: config.top_p,
            repetition_penalty: config.repetition_penalty,
            no_repeat_ngram_size: config.no_repeat_ngram_size,
            num_return_sequences: 1,
        }
    }
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// A text-to-text model behind some transport.
///
/// Implementations return the raw decoded text, special tokens included.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs (e.g., "http")
    fn generator_name(&self) -> &str;

    async fn generate(
        &self,
        input: &str,
        params: &DecodingParams,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_overrides_temperature_and_length() {
        let request = GenerationRequest::new("mango", 0.5, 512).unwrap();
        let params = DecodingParams::for_request(&request, &GenerationConfig::default());

        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_length, 512);
        assert_eq!(params.min_length, 60);
        assert_eq!(params.top_k, 50);
        assert!(params.do_sample);
        assert_eq!(params.num_return_sequences, 1);
    }

    #[test]
    fn test_min_length_never_exceeds_max_length() {
        let request = GenerationRequest::new("mango", 0.9, 20).unwrap();
        let params = DecodingParams::for_request(&request, &GenerationConfig::default());
        assert_eq!(params.min_length, 20);
    }
}
