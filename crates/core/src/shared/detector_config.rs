use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{BLOB_SCALE, BLOB_SIZE, CHANNEL_MEANS, CONFIDENCE_THRESHOLD};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Preprocessing and decoding parameters tied to one trained network.
///
/// The defaults match the bundled res10 SSD model. Override them only
/// together with the model artifacts they were trained for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub confidence_threshold: f32,
    pub input_size: u32,
    pub channel_means: [f32; 3],
    pub scale: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            input_size: BLOB_SIZE,
            channel_means: CHANNEL_MEANS,
            scale: BLOB_SCALE,
        }
    }
}

impl DetectorConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.input_size == 0 {
            return Err(ConfigError::Invalid("input_size must be > 0".into()));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale must be a positive finite number, got {}",
                self.scale
            )));
        }
        if self.channel_means.iter().any(|m| !m.is_finite()) {
            return Err(ConfigError::Invalid("channel_means must be finite".into()));
        }
        Ok(())
    }
}
