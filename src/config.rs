use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn default_max_rebalance_iterations() -> usize {
    10
}

fn default_load_tolerance() -> i64 {
    2
}

fn default_certified_load_offset() -> i64 {
    1
}

fn default_chief_balance_passes() -> usize {
    2
}

fn default_general_pool_passes() -> usize {
    2
}

/// Tuning knobs of the schedule builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Upper bound on rebalancing sweeps before the result is returned as is.
    #[serde(default = "default_max_rebalance_iterations")]
    pub max_rebalance_iterations: usize,
    /// Load spread (in on-call days) at which a day counts as unbalanced and a
    /// swap is attempted.
    #[serde(default = "default_load_tolerance")]
    pub load_tolerance: i64,
    /// Subtracted from a certified cadet's load when comparing loads.
    #[serde(default = "default_certified_load_offset")]
    pub certified_load_offset: i64,
    #[serde(default = "default_chief_balance_passes")]
    pub chief_balance_passes: usize,
    #[serde(default = "default_general_pool_passes")]
    pub general_pool_passes: usize,
    /// Fixed seed for the roster shuffle. `None` draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_rebalance_iterations: default_max_rebalance_iterations(),
            load_tolerance: default_load_tolerance(),
            certified_load_offset: default_certified_load_offset(),
            chief_balance_passes: default_chief_balance_passes(),
            general_pool_passes: default_general_pool_passes(),
            seed: None,
        }
    }
}

impl BuilderConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rebalance_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_rebalance_iterations must be at least 1".into(),
            ));
        }
        if self.load_tolerance < 1 {
            return Err(ConfigError::Invalid(format!(
                "load_tolerance must be at least 1 (got {})",
                self.load_tolerance
            )));
        }
        if self.certified_load_offset < 0 {
            return Err(ConfigError::Invalid(format!(
                "certified_load_offset must not be negative (got {})",
                self.certified_load_offset
            )));
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
