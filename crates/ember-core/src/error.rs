//! Error types for Ember

use thiserror::Error;

/// The main error type for Ember operations
#[derive(Debug, Error)]
pub enum EmberError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Class mismatch: expected {expected}, got {got}")]
    ClassMismatch { expected: String, got: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Graphics error: {0}")]
    GraphicsError(String),

    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for Ember operations
pub type Result<T> = std::result::Result<T, EmberError>;

impl From<toml::de::Error> for EmberError {
    fn from(err: toml::de::Error) -> Self {
        EmberError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for EmberError {
    fn from(err: toml::ser::Error) -> Self {
        EmberError::TomlSerError(err.to_string())
    }
}
