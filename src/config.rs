//! Game configuration loaded from `forager.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::skills::ExperienceTable;

fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_starting_scene() -> String { "forest".to_string() }
fn default_inventory_capacity() -> usize { 24 }
fn default_farm_plots() -> usize { 6 }
fn default_tick_interval_ms() -> u64 { 250 }
fn default_base_ms() -> u64 { 5000 }
fn default_per_level_ms() -> i64 { 100 }
fn default_min_ms() -> u64 { 1000 }

/// How long a forage takes: `max(min_ms, base_ms + (difficulty - level) * per_level_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ForagingTiming {
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,
    #[serde(default = "default_per_level_ms")]
    pub per_level_ms: i64,
    #[serde(default = "default_min_ms")]
    pub min_ms: u64,
}

impl Default for ForagingTiming {
    fn default() -> Self {
        Self {
            base_ms: default_base_ms(),
            per_level_ms: default_per_level_ms(),
            min_ms: default_min_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_starting_scene")]
    pub starting_scene: String,
    #[serde(default = "default_inventory_capacity")]
    pub inventory_capacity: usize,
    #[serde(default = "default_farm_plots")]
    pub farm_plots: usize,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Fixed seed for reproducible sessions; entropy when absent
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub foraging: ForagingTiming,
    /// Explicit cumulative thresholds, level 1 first. Formula table when absent.
    pub experience_table: Option<Vec<i64>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            starting_scene: default_starting_scene(),
            inventory_capacity: default_inventory_capacity(),
            farm_plots: default_farm_plots(),
            tick_interval_ms: default_tick_interval_ms(),
            rng_seed: None,
            foraging: ForagingTiming::default(),
            experience_table: None,
        }
    }
}

impl GameConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::load(path, e))?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::Load { reason, .. } => ConfigError::load(path, reason),
            other => other,
        })?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| ConfigError::load("<inline>", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inventory_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.foraging.min_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "foraging.min_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The experience table this config selects.
    pub fn experience_table(&self) -> Result<ExperienceTable, ConfigError> {
        match &self.experience_table {
            Some(thresholds) => ExperienceTable::from_thresholds(thresholds.clone()),
            None => Ok(ExperienceTable::standard()),
        }
    }
}
