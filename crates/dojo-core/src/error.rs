//! Core error types for dojo-core.
//!
//! Only configuration and program loading surface errors to the host.
//! Side-channel failures (audio, notifications, wake-lock) are reported as
//! [`BackendError`] and then logged and dropped by the session runner.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dojo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be prepared
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures reported by the audio, notification and wake-lock backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be brought up at all
    #[error("{backend} backend unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },

    /// A single operation failed
    #[error("{backend} backend failed: {message}")]
    Failed {
        backend: &'static str,
        message: String,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_source_errors() {
        let err: CoreError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, CoreError::Toml(_)));

        let err: CoreError = ValidationError::EmptyCollection("exercises".into()).into();
        assert_eq!(
            err.to_string(),
            "Validation error: Empty collection: exercises"
        );
    }
}
