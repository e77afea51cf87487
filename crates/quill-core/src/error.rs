//! Error types for quill-core.

use thiserror::Error;

/// Errors raised while loading, saving or validating a [`crate::GestureConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading or writing a config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value outside its accepted range.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}
