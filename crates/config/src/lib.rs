//! Logfan Configuration
//!
//! TOML-based configuration with sensible defaults. A minimal config only
//! names its destinations; every threshold and policy has a default.
//!
//! # Example Minimal Config
//!
//! ```toml
//! [destinations.alert]
//! severity_threshold = "error"
//! max_batch_events = 50
//! max_batch_age = "2s"
//!
//! [destinations.archive]
//! ```
//!
//! # Parsing
//!
//! ```
//! use logfan_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[destinations.archive]\n").unwrap();
//! assert!(config.destinations.contains_key("archive"));
//! ```

mod destinations;
mod error;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use logfan_event::PartitionKeyExtractor;
use serde::Deserialize;

pub use destinations::{BackpressurePolicy, DestinationConfig};
pub use error::{ConfigError, Result};

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Router-level settings
    pub router: RouterSection,

    /// Named destinations, each with its own thresholds and policies
    pub destinations: HashMap<String, DestinationConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found, naming the destination.
    pub fn validate(&self) -> Result<()> {
        if self.router.tick_interval.is_zero() {
            return Err(ConfigError::invalid("router", "tick_interval must be > 0"));
        }
        for (name, dest) in &self.destinations {
            dest.validate(name)?;
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(ConfigError::Parse)
    }
}

/// Router-level settings
///
/// # Example
///
/// ```toml
/// [router]
/// tick_interval = "200ms"
/// default_app = "unknown"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouterSection {
    /// Age-trigger re-evaluation interval
    ///
    /// Default: 200ms. Buffers may hold an event up to `max_batch_age`
    /// plus one tick before an age flush fires.
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,

    /// Fallback application name for events with an empty source
    ///
    /// Default: "unknown"
    pub default_app: String,
}

impl RouterSection {
    /// Build the partition key extractor this section configures
    ///
    /// Embedders that address archive objects by partition key derive
    /// their extractor here so events with an empty source fall back to
    /// the configured `default_app`.
    #[must_use]
    pub fn partition_extractor(&self) -> PartitionKeyExtractor {
        PartitionKeyExtractor::new().with_default_app(self.default_app.as_str())
    }
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            default_app: logfan_event::DEFAULT_APP.to_string(),
        }
    }
}

#[cfg(test)]
mod config_test;
