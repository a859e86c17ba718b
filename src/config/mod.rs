//! Crate configuration loaded from JSON.
//!
//! ```json
//! {
//!   "cache": {
//!     "enabled": true,
//!     "capacity_per_category": { "reference": 512, "calculation": 256, "ephemeris": 128 }
//!   },
//!   "search": {
//!     "longitude": { "step_days": 1.0, "max_iterations": 1000 },
//!     "station": { "convergence_days": 0.001 }
//!   }
//! }
//! ```
//!
//! Every field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::search::SearchSettings;

/// Errors loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level settings for the cache and the searches
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GocharaConfig {
    pub cache: CacheConfig,
    pub search: SearchSettings,
}

impl GocharaConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GocharaConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate().map_err(ConfigError::Invalid)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
