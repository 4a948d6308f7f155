use thiserror::Error;

/// Errors that can occur while generating a recipe
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The inference backend failed or returned something unusable
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Request parameters are out of range
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Failed to reach the inference backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or deserialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A built-in text pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised inside the repair stages.
///
/// These never reach callers of the service: they are turned into a
/// diagnostic string that embeds the raw model output.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("Failed to render recipe: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Recipe title is empty after normalization")]
    EmptyTitle,
}
