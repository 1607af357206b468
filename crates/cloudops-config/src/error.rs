//! Configuration error types

use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// Values were read but are not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot find config directory")]
    MissingConfigDir,
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
