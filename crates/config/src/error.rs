//! Configuration error types

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field value failed validation
    #[error("invalid config for '{section}': {reason}")]
    Invalid { section: String, reason: String },
}

impl ConfigError {
    /// Validation failure in a named section
    pub fn invalid(section: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section: section.into(),
            reason: reason.into(),
        }
    }
}
