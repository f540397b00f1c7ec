//! Screener configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! standard screening rules:
//!
//! ```toml
//! [classifier]
//! lookback = 120
//! squeeze_percentile = 0.2
//!
//! [risk]
//! swing_lookback = 60
//!
//! [features]
//! min_bars = 200
//! round = true
//! round_decimals = 4
//!
//! [screen]
//! throttle_ms = 1000
//! ```

use crate::features::FeatureParams;
use crate::risk::RiskParams;
use crate::screen::ScreenParams;
use crate::signals::ClassifierParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenerConfig {
    pub classifier: ClassifierParams,
    pub risk: RiskParams,
    pub features: FeatureParams,
    pub screen: ScreenParams,
}

impl ScreenerConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every window fits inside the classifier lookback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if c.lookback < 2 {
            return invalid(format!("classifier.lookback must be >= 2, got {}", c.lookback));
        }
        if !(0.0..=1.0).contains(&c.squeeze_percentile) {
            return invalid(format!(
                "classifier.squeeze_percentile must be in [0, 1], got {}",
                c.squeeze_percentile
            ));
        }
        if c.trend_lookback < 3 || c.trend_lookback > c.lookback {
            return invalid(format!(
                "classifier.trend_lookback must be in [3, lookback={}], got {}",
                c.lookback, c.trend_lookback
            ));
        }
        if c.pullback_end >= c.pullback_start || c.pullback_start > c.lookback {
            return invalid(format!(
                "classifier pullback window [{}, {}) must be non-empty and within lookback={}",
                c.pullback_start, c.pullback_end, c.lookback
            ));
        }
        if !(c.near_ema_tolerance >= 0.0) || !(c.pullback_band >= 0.0) {
            return invalid("classifier tolerances must be non-negative numbers".into());
        }
        if self.risk.swing_lookback < 2 {
            return invalid(format!(
                "risk.swing_lookback must be >= 2, got {}",
                self.risk.swing_lookback
            ));
        }
        if self.features.min_bars < c.lookback {
            return invalid(format!(
                "features.min_bars ({}) must be >= classifier.lookback ({})",
                self.features.min_bars, c.lookback
            ));
        }
        Ok(())
    }
}
