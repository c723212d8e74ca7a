//! Generation settings loaded from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::markov::{MarkovError, MarkovModel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid model settings: {0}")]
    Model(#[from] MarkovError),
}

/// Settings for building a model and running a generation.
///
/// ```ron
/// (
///     window_length: 4,
///     seed: Some(42),
///     length: 300,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_window_length")]
    pub window_length: usize,
    /// Fixed RNG seed; `None` draws a fresh one each run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of characters to add after the seed text.
    #[serde(default = "default_length")]
    pub length: usize,
}

fn default_window_length() -> usize {
    3
}

fn default_length() -> usize {
    200
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
            seed: None,
            length: default_length(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Build an untrained model from these settings.
    pub fn build_model(&self) -> Result<MarkovModel, ConfigError> {
        Ok(MarkovModel::new(self.window_length, self.seed)?)
    }
}
