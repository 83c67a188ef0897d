//! Error types for the API crate.

use std::path::Path;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating the server configuration.
///
/// Handler-level failures never use this type; they are mapped straight to
/// HTTP responses inside the API module.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but cannot be used.
    #[error("Configuration error in {path}: {message}\n\nSuggestion: Fix the JSON syntax, or delete the file to run with defaults")]
    Parse {
        /// Path of the offending file.
        path: String,
        /// What went wrong while reading or parsing.
        message: String,
    },

    /// A configuration value fails validation.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    Validation {
        /// What is wrong with the value.
        message: String,
        /// How to fix it.
        suggestion: String,
    },
}

impl ConfigError {
    /// Creates a parse error for the given file.
    #[must_use]
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a validation error with a fix suggestion.
    #[must_use]
    pub fn validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }
}
