//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading the shell configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in the config values.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },
}
