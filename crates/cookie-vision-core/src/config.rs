//! Collector configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::capture::{CANONICAL_HEIGHT, CANONICAL_WIDTH};
use crate::error::{Error, Result};

/// Configuration for the dataset collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding features.npy and labels.npy
    pub data_dir: PathBuf,
    /// Canonical capture width (the `W0` of the geometry rule)
    pub canonical_width: u32,
    /// Canonical capture height (the `H0` of the geometry rule)
    pub canonical_height: u32,
    /// Block-mean pool size; 1 stores full-resolution frames
    pub pool_size: u32,
    /// Post-capture cooldown in milliseconds
    pub cooldown_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("dataset"),
            canonical_width: CANONICAL_WIDTH,
            canonical_height: CANONICAL_HEIGHT,
            pool_size: 1,
            cooldown_ms: 1000,
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cookie-vision").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if not found
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to disk
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            std::fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Reject configurations the pipeline cannot run with.
    ///
    /// The config file is operator-edited JSON, so values like a zero pool
    /// size can arrive here unchecked.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::Config(
                "pool size must be at least 1".to_string(),
            ));
        }
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(Error::Config(format!(
                "canonical resolution {}x{} has no pixels",
                self.canonical_width, self.canonical_height
            )));
        }
        Ok(())
    }

    /// Post-capture cooldown as a `Duration`
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Feature vector length implied by this configuration
    pub fn feature_len(&self) -> usize {
        crate::encoder::feature_len(self.canonical_width, self.canonical_height, self.pool_size)
    }
}
