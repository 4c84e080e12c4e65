//! All static game data, loaded once at startup and shared read-only.

use std::sync::Arc;

use tracing::info;

use super::ItemRegistry;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::farming::SeedRegistry;
use crate::scene::SceneRegistry;
use crate::skills::ExperienceTable;

#[derive(Debug, Clone)]
pub struct GameData {
    pub items: ItemRegistry,
    pub seeds: Arc<SeedRegistry>,
    pub scenes: SceneRegistry,
    pub xp_table: Arc<ExperienceTable>,
}

impl GameData {
    /// Load items, seeds and scenes from `config.data_dir` and check every
    /// cross-reference, including that `config.starting_scene` exists.
    pub fn load(config: &GameConfig) -> Result<Self, ConfigError> {
        let mut items = ItemRegistry::new();
        items.load_from_directory(&config.data_dir)?;

        let mut seeds = SeedRegistry::new();
        seeds.load_from_directory(&config.data_dir)?;

        let mut scenes = SceneRegistry::new();
        scenes.load_from_directory(&config.data_dir, &items)?;

        let data = Self::from_parts(items, seeds, scenes, config.experience_table()?)?;
        data.scenes.require(&config.starting_scene)?;

        info!(
            "Game data ready: {} items, {} seeds, {} scenes, max level {}",
            data.items.len(),
            data.seeds.len(),
            data.scenes.len(),
            data.xp_table.max_level()
        );

        Ok(data)
    }

    /// Assemble already-built registries, validating the seed and scene graphs.
    pub fn from_parts(
        items: ItemRegistry,
        seeds: SeedRegistry,
        scenes: SceneRegistry,
        xp_table: ExperienceTable,
    ) -> Result<Self, ConfigError> {
        seeds.validate(&items)?;
        scenes.validate()?;

        Ok(Self {
            items,
            seeds: Arc::new(seeds),
            scenes,
            xp_table: Arc::new(xp_table),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, family: &str, content: &str) {
        let family_dir = dir.join(family);
        std::fs::create_dir_all(&family_dir).unwrap();
        std::fs::write(family_dir.join("test.toml"), content).unwrap();
    }

    fn config_for(dir: &Path) -> GameConfig {
        GameConfig {
            data_dir: dir.to_path_buf(),
            ..GameConfig::default()
        }
    }

    fn write_minimal(dir: &Path) {
        write(
            dir,
            "items",
            r#"
[apple]
weight = 50
experience = 20

[cabbage_seed]
category = "seed"
weight = 95
experience = 75

[cabbage]
category = "crop"
weight = 0
"#,
        );
        write(
            dir,
            "seeds",
            r#"
[cabbage_seed]
max_stage = 5
growth_times_ms = [30000, 30000, 30000, 30000, 30000]
crop_id = "cabbage"
base_yield = 5
base_experience = 10
"#,
        );
        write(
            dir,
            "scenes",
            r#"
[forest]
adjacent = ["farm"]
loot = ["apple", "cabbage_seed"]
difficulty = 1

[farm]
adjacent = ["forest"]
farm = true
"#,
        );
    }

    #[test]
    fn test_load_and_cross_validate() {
        let temp_dir = TempDir::new().unwrap();
        write_minimal(temp_dir.path());

        let data = GameData::load(&config_for(temp_dir.path())).unwrap();
        assert_eq!(data.items.len(), 3);
        assert_eq!(data.seeds.len(), 1);
        assert_eq!(data.scenes.len(), 2);
        assert_eq!(data.xp_table.threshold_for_level(2).unwrap(), 83);
    }

    #[test]
    fn test_missing_starting_scene_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_minimal(temp_dir.path());

        let config = GameConfig {
            starting_scene: "volcano".to_string(),
            ..config_for(temp_dir.path())
        };
        assert_eq!(
            GameData::load(&config).unwrap_err(),
            ConfigError::UnknownScene("volcano".to_string())
        );
    }

    #[test]
    fn test_unknown_loot_item_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_minimal(temp_dir.path());
        write(
            temp_dir.path(),
            "scenes",
            r#"
[forest]
loot = ["truffle"]
"#,
        );

        assert_eq!(
            GameData::load(&config_for(temp_dir.path())).unwrap_err(),
            ConfigError::UnknownItem("truffle".to_string())
        );
    }

    #[test]
    fn test_bad_experience_table_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_minimal(temp_dir.path());

        let config = GameConfig {
            experience_table: Some(vec![0, 100, 50]),
            ..config_for(temp_dir.path())
        };
        assert!(matches!(
            GameData::load(&config),
            Err(ConfigError::InvalidExperienceTable(_))
        ));
    }
}
