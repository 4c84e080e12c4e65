//! Seed Registry
//!
//! Loads and caches seed definitions from TOML files.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::definition::{RawSeedDefinition, SeedDefinition};
use crate::data::ItemRegistry;
use crate::error::ConfigError;

/// Registry for all plantable seeds
#[derive(Debug, Clone)]
pub struct SeedRegistry {
    seeds: HashMap<String, SeedDefinition>,
}

impl SeedRegistry {
    pub fn new() -> Self {
        Self {
            seeds: HashMap::new(),
        }
    }

    /// Load all seed definitions from `<data_dir>/seeds/*.toml`
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), ConfigError> {
        let seeds_dir = data_dir.join("seeds");

        if !seeds_dir.exists() {
            warn!("Seeds directory does not exist: {:?}", seeds_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&seeds_dir)
            .map_err(|e| ConfigError::load(&seeds_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::load(&seeds_dir, e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::load(&path, e))?;

                let table: HashMap<String, RawSeedDefinition> = toml::from_str(&content)
                    .map_err(|e| ConfigError::load(&path, e))?;

                for (id, raw) in table {
                    if self.seeds.contains_key(&id) {
                        warn!("Duplicate seed ID '{}' in {:?}, overwriting", id, path);
                    }
                    let seed = SeedDefinition::from_raw(&id, &raw)?;
                    info!(
                        "Loaded seed: {} -> {} ({} stages, {}ms)",
                        id,
                        seed.crop_id,
                        seed.max_stage,
                        seed.total_growth_ms()
                    );
                    self.seeds.insert(id, seed);
                }
            }
        }

        info!("Loaded {} seed definitions", self.seeds.len());

        Ok(())
    }

    pub fn insert(&mut self, seed: SeedDefinition) {
        self.seeds.insert(seed.id.clone(), seed);
    }

    /// Every seed and crop must be a catalogue item.
    pub fn validate(&self, items: &ItemRegistry) -> Result<(), ConfigError> {
        for seed in self.seeds.values() {
            seed.validate_items(items)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SeedDefinition> {
        self.seeds.get(id)
    }

    /// Get a seed, failing loudly for unknown IDs
    pub fn require(&self, id: &str) -> Result<&SeedDefinition, ConfigError> {
        self.seeds
            .get(id)
            .ok_or_else(|| ConfigError::UnknownSeed(id.to_string()))
    }

    pub fn all(&self) -> impl Iterator<Item = &SeedDefinition> {
        self.seeds.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seeds.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl Default for SeedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ItemCategory, ItemDefinition};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_seeds_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        let seeds_dir = temp_dir.path().join("seeds");
        std::fs::create_dir(&seeds_dir).unwrap();

        let toml_content = r#"
[cabbage_seed]
max_stage = 5
growth_times_ms = [30000, 30000, 30000, 30000, 30000]
crop_id = "cabbage"
base_yield = 5
base_experience = 10
"#;

        let mut file = std::fs::File::create(seeds_dir.join("vegetables.toml")).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let mut registry = SeedRegistry::new();
        registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(registry.len(), 1);
        let seed = registry.require("cabbage_seed").unwrap();
        assert_eq!(seed.max_stage, 5);
        assert!(matches!(registry.require("turnip_seed"), Err(ConfigError::UnknownSeed(_))));
    }

    #[test]
    fn test_validate_against_items() {
        let mut registry = SeedRegistry::new();
        registry.insert(SeedDefinition {
            id: "cabbage_seed".to_string(),
            max_stage: 2,
            growth_times_ms: vec![10],
            crop_id: "cabbage".to_string(),
            base_yield: 1,
            base_experience: 1,
        });

        let mut items: ItemRegistry =
            [ItemDefinition::new("cabbage_seed", 95, 75, 1).with_category(ItemCategory::Seed)]
                .into_iter()
                .collect();
        assert_eq!(
            registry.validate(&items),
            Err(ConfigError::UnknownItem("cabbage".to_string()))
        );

        items.insert(ItemDefinition::new("cabbage", 0, 0, 1).with_category(ItemCategory::Crop));
        assert!(registry.validate(&items).is_ok());
    }
}
