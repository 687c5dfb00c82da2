// shopscore-cli/src/config.rs
// ============================================================================
// Module: Shopscore CLI Configuration
// Description: Optional TOML configuration for the bench CLI.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, shopscore-core, toml
// ============================================================================

//! ## Overview
//! Configuration is optional: with no file present the CLI runs on built-in
//! defaults. When a file is given it is parsed strictly with a size cap and
//! unknown keys rejected, and any error fails the run rather than silently
//! degrading to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use shopscore_core::EvaluatorPolicy;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "shopscore.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SHOPSCORE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem access failed.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file exceeds the size cap.
    #[error("config '{path}' is {actual} bytes, limit is {limit}")]
    Oversized {
        /// Path that failed.
        path: PathBuf,
        /// Size limit in bytes.
        limit: u64,
        /// Actual size in bytes.
        actual: u64,
    },
    /// The config file is not valid TOML for the config model.
    #[error("invalid config '{path}': {reason}")]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Parser failure detail.
        reason: String,
    },
    /// The price tolerance is negative, NaN, or infinite.
    #[error("evaluation.price_tolerance_usd must be a non-negative finite number, got {value}")]
    InvalidTolerance {
        /// Offending value.
        value: f64,
    },
    /// A refurbished marker entry is empty.
    #[error("evaluation.refurbished_markers entries must be non-empty")]
    EmptyMarker,
    /// A first-party seller entry has an empty retailer or seller.
    #[error("evaluation.first_party_sellers entries must have non-empty keys and values")]
    EmptySellerEntry,
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Root bench configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Fixture location settings.
    #[serde(default)]
    pub fixtures: FixturesConfig,
    /// Evaluation policy overrides.
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Fixture location settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturesConfig {
    /// Case-study directory override.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Schema file override.
    #[serde(default)]
    pub schema: Option<PathBuf>,
}

/// Evaluation policy overrides; unset fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Price comparison tolerance override.
    #[serde(default)]
    pub price_tolerance_usd: Option<f64>,
    /// Refurbished marker token override (replaces the default set).
    #[serde(default)]
    pub refurbished_markers: Option<Vec<String>>,
    /// First-party seller table override (replaces the default table).
    #[serde(default)]
    pub first_party_sellers: Option<BTreeMap<String, String>>,
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl BenchConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the file is unreadable, oversized,
    /// malformed, or carries invalid override values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Oversized {
                path: path.to_path_buf(),
                limit: MAX_CONFIG_FILE_SIZE,
                actual: metadata.len(),
            });
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates override values.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = self.evaluation.price_tolerance_usd
            && (!value.is_finite() || value < 0.0)
        {
            return Err(ConfigError::InvalidTolerance {
                value,
            });
        }
        if let Some(markers) = &self.evaluation.refurbished_markers
            && markers.iter().any(|marker| marker.trim().is_empty())
        {
            return Err(ConfigError::EmptyMarker);
        }
        if let Some(sellers) = &self.evaluation.first_party_sellers
            && sellers
                .iter()
                .any(|(retailer, seller)| retailer.trim().is_empty() || seller.trim().is_empty())
        {
            return Err(ConfigError::EmptySellerEntry);
        }
        Ok(())
    }

    /// Builds the evaluator policy: defaults with config overrides applied.
    #[must_use]
    pub fn evaluator_policy(&self) -> EvaluatorPolicy {
        let mut policy = EvaluatorPolicy::default();
        if let Some(value) = self.evaluation.price_tolerance_usd {
            policy.price_tolerance_usd = value;
        }
        if let Some(markers) = &self.evaluation.refurbished_markers {
            policy.refurbished_markers = markers.clone();
        }
        if let Some(sellers) = &self.evaluation.first_party_sellers {
            policy.first_party_sellers = sellers
                .iter()
                .map(|(retailer, seller)| {
                    (retailer.trim().to_lowercase(), seller.trim().to_lowercase())
                })
                .collect();
        }
        policy
    }
}
