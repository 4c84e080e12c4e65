//! Seed Definitions
//!
//! What a seed grows into and how long each growth stage lasts.

use serde::Deserialize;

use crate::data::ItemRegistry;
use crate::error::ConfigError;

/// Raw seed entry from TOML, keyed by the seed's item id
#[derive(Debug, Clone, Deserialize)]
pub struct RawSeedDefinition {
    pub max_stage: u32,
    /// Duration of each stage in milliseconds, stage 1 first
    pub growth_times_ms: Vec<u64>,
    pub crop_id: String,
    pub base_yield: u32,
    #[serde(default)]
    pub base_experience: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    /// Item id of the seed itself
    pub id: String,
    pub max_stage: u32,
    pub growth_times_ms: Vec<u64>,
    /// Item id of the harvested crop
    pub crop_id: String,
    pub base_yield: u32,
    /// Farming experience per crop harvested
    pub base_experience: u32,
}

impl SeedDefinition {
    pub fn from_raw(id: &str, raw: &RawSeedDefinition) -> Result<Self, ConfigError> {
        let seed = Self {
            id: id.to_string(),
            max_stage: raw.max_stage,
            growth_times_ms: raw.growth_times_ms.clone(),
            crop_id: raw.crop_id.clone(),
            base_yield: raw.base_yield,
            base_experience: raw.base_experience,
        };
        seed.validate()?;
        Ok(seed)
    }

    fn invalid(&self, reason: String) -> ConfigError {
        ConfigError::InvalidSeed {
            seed_id: self.id.clone(),
            reason,
        }
    }

    /// Stage counts and durations must be usable by the growth state machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stage == 0 {
            return Err(self.invalid("max_stage must be at least 1".to_string()));
        }
        let needed = (self.max_stage - 1) as usize;
        if self.growth_times_ms.len() < needed {
            return Err(self.invalid(format!(
                "{} stages need at least {} growth times, got {}",
                self.max_stage,
                needed,
                self.growth_times_ms.len()
            )));
        }
        if self.base_yield == 0 {
            return Err(self.invalid("base_yield must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Check that the seed and crop exist in the item catalogue.
    pub fn validate_items(&self, items: &ItemRegistry) -> Result<(), ConfigError> {
        items.require(&self.id)?;
        items.require(&self.crop_id)?;
        Ok(())
    }

    /// Time spent in `stage` before moving to the next one
    pub fn stage_duration_ms(&self, stage: u32) -> Option<u64> {
        if stage == 0 || stage >= self.max_stage {
            return None;
        }
        self.growth_times_ms.get((stage - 1) as usize).copied()
    }

    /// Time from planting until fully grown
    pub fn total_growth_ms(&self) -> u64 {
        (1..self.max_stage).filter_map(|s| self.stage_duration_ms(s)).sum()
    }

    /// Largest possible harvest
    pub fn max_yield(&self) -> u32 {
        self.base_yield.saturating_mul(2)
    }
}
