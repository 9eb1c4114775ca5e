//! Run settings — RON-loadable defaults plus the values derived from them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Upper bound for completion temperature.
const MAX_TEMPERATURE: f32 = 2.0;
/// Temperature added per requested response when more than one is asked for.
const TEMPERATURE_PER_RESPONSE: f32 = 0.25;

/// Settings for one generation run.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```ron
/// (order: 3, length: 80, similarity_threshold: 0.7)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MimicConfig {
    /// Corpus used when none is given on the command line.
    pub training_corpus: Option<PathBuf>,
    /// Markov order (words per lookup key).
    pub order: usize,
    /// Number of words to generate.
    pub length: usize,
    /// Explicit completion token limit; derived from `length` when unset.
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub num_responses: u32,
    pub model: String,
    /// Words per sliding window in the similarity check.
    pub similarity_window: usize,
    /// Window score at or above which output counts as copied.
    pub similarity_threshold: f32,
    /// Sentiment lexicon used by `--sentiment`.
    pub lexicon: Option<PathBuf>,
}

impl Default for MimicConfig {
    fn default() -> Self {
        Self {
            training_corpus: None,
            order: 2,
            length: 50,
            max_tokens: None,
            temperature: 0.7,
            num_responses: 1,
            model: "gpt-3.5-turbo-instruct".to_string(),
            similarity_window: 5,
            similarity_threshold: 0.8,
            lexicon: None,
        }
    }
}

impl MimicConfig {
    /// Load a config from a RON file and validate it.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: MimicConfig = ron::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.order == 0 {
            return Err(ConfigError::Invalid("order must be at least 1".into()));
        }
        if self.similarity_window == 0 {
            return Err(ConfigError::Invalid(
                "similarity_window must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(
                "similarity_threshold must be between 0.0 and 1.0".into(),
            ));
        }
        if self.num_responses == 0 {
            return Err(ConfigError::Invalid(
                "num_responses must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Completion token budget.
    ///
    /// One token is roughly three quarters of a word, so the default budget is
    /// `length * 4 / 3`. An explicit `max_tokens` wins only when it exceeds
    /// the word length.
    pub fn effective_max_tokens(&self) -> u32 {
        let derived = (self.length as u64 * 4 / 3).min(u32::MAX as u64) as u32;
        match self.max_tokens {
            Some(explicit) if explicit as usize > self.length => explicit,
            _ => derived,
        }
    }

    /// Completion temperature, raised for multi-response requests and clamped
    /// to `0.0..=2.0`.
    pub fn effective_temperature(&self) -> f32 {
        let mut temperature = self.temperature;
        if self.num_responses > 1 {
            temperature += self.num_responses as f32 * TEMPERATURE_PER_RESPONSE;
        }
        temperature.clamp(0.0, MAX_TEMPERATURE)
    }
}
