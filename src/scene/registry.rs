//! Scene Registry
//!
//! Loads scene definitions from TOML files and checks the scene graph.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::definition::{RawSceneDefinition, Scene};
use crate::data::ItemRegistry;
use crate::error::ConfigError;

/// Registry for all scenes
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    scenes: HashMap<String, Scene>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
        }
    }

    /// Load all scenes from `<data_dir>/scenes/*.toml`, resolving loot against `items`
    pub fn load_from_directory(
        &mut self,
        data_dir: &Path,
        items: &ItemRegistry,
    ) -> Result<(), ConfigError> {
        let scenes_dir = data_dir.join("scenes");

        if !scenes_dir.exists() {
            warn!("Scenes directory does not exist: {:?}", scenes_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&scenes_dir)
            .map_err(|e| ConfigError::load(&scenes_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::load(&scenes_dir, e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::load(&path, e))?;

                let table: HashMap<String, RawSceneDefinition> = toml::from_str(&content)
                    .map_err(|e| ConfigError::load(&path, e))?;

                for (id, raw) in table {
                    if self.scenes.contains_key(&id) {
                        warn!("Duplicate scene ID '{}' in {:?}, overwriting", id, path);
                    }
                    let scene = Scene::from_raw(&id, &raw, items)?;
                    info!(
                        "Loaded scene: {} ({}) - {} loot entries, {} exits",
                        scene.display_name,
                        id,
                        scene.loot.len(),
                        scene.adjacent.len()
                    );
                    self.scenes.insert(id, scene);
                }
            }
        }

        info!("Loaded {} scene definitions", self.scenes.len());

        Ok(())
    }

    pub fn insert(&mut self, scene: Scene) {
        self.scenes.insert(scene.id.clone(), scene);
    }

    /// Every adjacency must name a known scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for scene in self.scenes.values() {
            if let Some(missing) = scene.adjacent.iter().find(|id| !self.scenes.contains_key(*id)) {
                warn!("Scene '{}' lists unknown neighbour '{}'", scene.id, missing);
                return Err(ConfigError::UnknownScene(missing.clone()));
            }
        }
        Ok(())
    }

    /// Get a scene by ID
    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Get a scene, failing loudly for unknown IDs
    pub fn require(&self, id: &str) -> Result<&Scene, ConfigError> {
        self.scenes
            .get(id)
            .ok_or_else(|| ConfigError::UnknownScene(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.scenes.keys()
    }

    pub fn all(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
