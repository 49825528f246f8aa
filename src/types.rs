//! Configuration types for safe-token

use crate::config_error;
use crate::error::Result;
use crate::token::SafeTokenGenerator;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the comma-separated blocklist
pub const ENV_BLOCK_LIST: &str = "SAFE_TOKEN_BLOCK_LIST";
/// Environment variable holding the token length
pub const ENV_LENGTH: &str = "SAFE_TOKEN_LENGTH";
/// Environment variable holding an optional seed
pub const ENV_SEED: &str = "SAFE_TOKEN_SEED";

/// Default token length
pub const DEFAULT_LENGTH: usize = 12;

/// Configuration for token generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub block_list: Vec<String>,
    pub length: usize,
    /// Fixed seed for reproducible tokens; entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            block_list: Vec::new(),
            length: DEFAULT_LENGTH,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a JSON configuration; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    /// Load configuration from a `.env` style file, then the environment.
    ///
    /// Variables already set in the environment win over the file.
    pub fn from_env_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenv::from_path(path)
            .map_err(|e| config_error!("Failed to load {}: {}", path.display(), e))?;
        Self::from_env()
    }

    /// Build configuration from key/value pairs. Unknown keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_BLOCK_LIST => config.block_list = parse_block_list(value),
                ENV_LENGTH => {
                    config.length = value
                        .parse()
                        .map_err(|_| config_error!("{} must be a non-negative integer, got '{}'", ENV_LENGTH, value))?;
                }
                ENV_SEED if value.is_empty() => config.seed = None,
                ENV_SEED => {
                    let seed = value
                        .parse()
                        .map_err(|_| config_error!("{} must be an unsigned integer, got '{}'", ENV_SEED, value))?;
                    config.seed = Some(seed);
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Build a generator from this configuration
    pub fn build(&self) -> Result<SafeTokenGenerator<StdRng>> {
        match self.seed {
            Some(seed) => SafeTokenGenerator::with_seed(&self.block_list, seed),
            None => SafeTokenGenerator::new(&self.block_list),
        }
    }

    /// Build a generator and mint a single token of the configured length
    pub fn generate(&self) -> Result<String> {
        self.build()?.generate(self.length)
    }
}

fn parse_block_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(String::from)
        .collect()
}
