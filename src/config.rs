use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::rules::RuleSet;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Inference server connection
    #[serde(default)]
    pub model: ModelConfig,
    /// Decoding parameters sent with every generation
    #[serde(default)]
    pub generation: GenerationConfig,
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Overrides for the keyword tables driving the pipeline
    #[serde(default)]
    pub rules: RuleSet,
}

/// Where the fine-tuned model is served
#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Base URL of the inference server. Unset means no model is loaded.
    pub endpoint: Option<String>,
    /// Bearer token for the inference server
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout: default_model_timeout(),
        }
    }
}

/// Decoding defaults. `temperature` and `max_length` are per-request
/// and only used here when the caller gives none.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,
    #[serde(default = "default_no_repeat_ngram_size")]
    pub no_repeat_ngram_size: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            repetition_penalty: default_repetition_penalty(),
            no_repeat_ngram_size: default_no_repeat_ngram_size(),
        }
    }
}

/// HTTP service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Generations allowed to run at once; later requests wait for a slot
    #[serde(default = "default_max_concurrent_generations")]
    pub max_concurrent_generations: usize,
    /// Upper bound on one generation, queueing included, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Comma-separated origins, or "*" for any
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_generations: default_max_concurrent_generations(),
            request_timeout: default_request_timeout(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

// Default value functions
fn default_model_timeout() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.9
}

fn default_max_length() -> u32 {
    256
}

fn default_min_length() -> u32 {
    60
}

fn default_top_k() -> u32 {
    50
}

fn default_top_p() -> f32 {
    0.92
}

fn default_repetition_penalty() -> f32 {
    1.2
}

fn default_no_repeat_ngram_size() -> u32 {
    2
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_concurrent_generations() -> usize {
    1
}

fn default_request_timeout() -> u64 {
    120
}

fn default_cors_allowed_origins() -> String {
    "*".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the lookup order.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from a TOML string, ignoring the environment.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with MATCHAGEN__ prefix
/// 2. matchagen.toml file in current directory
/// 3. Default values
///
/// Environment variable format: MATCHAGEN__MODEL__ENDPOINT
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("matchagen")
}

/// Same as [`load_config`] with an explicit config file path (extension
/// optional).
pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name(path).required(false))
        // Use double underscore for nested: MATCHAGEN__SERVER__PORT
        .add_source(
            Environment::with_prefix("MATCHAGEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
