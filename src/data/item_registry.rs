use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use super::item_def::{ItemDefinition, RawItemDefinition};
use crate::error::ConfigError;

/// Registry for all item definitions
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Load all item definitions from `<data_dir>/items/*.toml`
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), ConfigError> {
        let items_dir = data_dir.join("items");

        if !items_dir.exists() {
            warn!("Items directory does not exist: {:?}", items_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&items_dir)
            .map_err(|e| ConfigError::load(&items_dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::load(&items_dir, e))?;
            let path = entry.path();

            if path.extension().map_or(false, |ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::load(&path, e))?;

                // Parse as table of items
                let table: HashMap<String, RawItemDefinition> = toml::from_str(&content)
                    .map_err(|e| ConfigError::load(&path, e))?;

                for (id, raw) in table {
                    if self.items.contains_key(&id) {
                        warn!("Duplicate item ID '{}' in {:?}, overwriting", id, path);
                    }
                    self.items.insert(id.clone(), ItemDefinition::from_raw(&id, &raw));
                }
            }
        }

        info!("Loaded {} item definitions", self.items.len());

        Ok(())
    }

    /// Register a definition directly
    pub fn insert(&mut self, item: ItemDefinition) {
        if self.items.contains_key(&item.id) {
            warn!("Duplicate item ID '{}', overwriting", item.id);
        }
        self.items.insert(item.id.clone(), item);
    }

    /// Get an item definition by ID
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Get an item definition, failing loudly for unknown IDs
    pub fn require(&self, id: &str) -> Result<&ItemDefinition, ConfigError> {
        self.items
            .get(id)
            .ok_or_else(|| ConfigError::UnknownItem(id.to_string()))
    }

    /// Get all item IDs
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    /// Get all items
    pub fn all(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    /// Check if an item exists
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Get the number of loaded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ItemDefinition> for ItemRegistry {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for item in iter {
            registry.insert(item);
        }
        registry
    }
}
