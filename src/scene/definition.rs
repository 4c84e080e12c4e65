//! Scene Definitions
//!
//! Raw TOML structures and the resolved `Scene` with its loot table bound to
//! item definitions.

use serde::Deserialize;

use crate::data::{ItemDefinition, ItemRegistry};
use crate::error::ConfigError;

// ============================================================================
// Raw TOML Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawSceneDefinition {
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub adjacent: Vec<String>,
    /// Item ids, in draw order
    #[serde(default)]
    pub loot: Vec<String>,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default)]
    pub bank: bool,
    #[serde(default)]
    pub farm: bool,
}

// ============================================================================
// Resolved Structures
// ============================================================================

#[derive(Debug, Clone)]
pub struct Scene {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Reachable scenes; need not be symmetric
    pub adjacent: Vec<String>,
    pub loot: Vec<ItemDefinition>,
    pub difficulty: i32,
    pub bank: bool,
    pub farm: bool,
}

impl Scene {
    /// Resolve a raw scene, binding its loot ids to item definitions.
    pub fn from_raw(
        id: &str,
        raw: &RawSceneDefinition,
        items: &ItemRegistry,
    ) -> Result<Self, ConfigError> {
        let loot = raw
            .loot
            .iter()
            .map(|item_id| items.require(item_id).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: id.to_string(),
            display_name: raw
                .display_name
                .clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            description: raw.description.clone().unwrap_or_default(),
            adjacent: raw.adjacent.clone(),
            loot,
            difficulty: raw.difficulty,
            bank: raw.bank,
            farm: raw.farm,
        })
    }

    pub fn is_adjacent(&self, scene_id: &str) -> bool {
        self.adjacent.iter().any(|s| s == scene_id)
    }
}
