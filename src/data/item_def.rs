use serde::{Deserialize, Serialize};

// ============================================================================
// Item Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Forage,
    Seed,
    Crop,
}

impl Default for ItemCategory {
    fn default() -> Self {
        ItemCategory::Forage
    }
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Forage => "forage",
            ItemCategory::Seed => "seed",
            ItemCategory::Crop => "crop",
        }
    }
}

// ============================================================================
// Raw Item Definition (direct from TOML)
// ============================================================================

fn default_weight() -> u32 { 50 }
fn default_level() -> i32 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct RawItemDefinition {
    pub display_name: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ItemCategory,
    /// Relative chance in loot draws; 0 means never drawn
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Experience awarded per unit collected
    #[serde(default)]
    pub experience: u32,
    #[serde(default = "default_level")]
    pub level_required: i32,
}

// ============================================================================
// Resolved Item Definition
// ============================================================================

/// Immutable catalogue entry. Containers only ever hold the id and a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDefinition {
    pub id: String,
    pub display_name: String,
    pub icon: String,
    pub description: String,
    pub category: ItemCategory,
    pub weight: u32,
    pub experience: u32,
    pub level_required: i32,
}

impl ItemDefinition {
    pub fn from_raw(id: &str, raw: &RawItemDefinition) -> Self {
        Self {
            id: id.to_string(),
            display_name: raw.display_name.clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            icon: raw.icon.clone()
                .unwrap_or_else(|| format!("{}.png", id)),
            description: raw.description.clone()
                .unwrap_or_default(),
            category: raw.category,
            weight: raw.weight,
            experience: raw.experience,
            level_required: raw.level_required,
        }
    }

    /// Shorthand used by tests and hand-built catalogues.
    pub fn new(id: &str, weight: u32, experience: u32, level_required: i32) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.replace('_', " "),
            icon: format!("{}.png", id),
            description: String::new(),
            category: ItemCategory::Forage,
            weight,
            experience,
            level_required,
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn is_seed(&self) -> bool {
        self.category == ItemCategory::Seed
    }

    /// Whether a forager at `level` may find this item
    pub fn is_eligible(&self, level: i32) -> bool {
        self.level_required <= level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_item() {
        let toml_str = r#"
            [truffle]
            display_name = "Truffle"
            icon = "truffle-transparent.png"
            weight = 25
            experience = 180
            level_required = 2
        "#;

        let parsed: HashMap<String, RawItemDefinition> = toml::from_str(toml_str).unwrap();
        let item = ItemDefinition::from_raw("truffle", &parsed["truffle"]);
        assert_eq!(item.display_name, "Truffle");
        assert_eq!(item.weight, 25);
        assert_eq!(item.experience, 180);
        assert!(!item.is_eligible(1));
        assert!(item.is_eligible(2));
    }

    #[test]
    fn test_item_defaults() {
        let toml_str = r#"
            [wild_onion]
        "#;

        let parsed: HashMap<String, RawItemDefinition> = toml::from_str(toml_str).unwrap();
        let item = ItemDefinition::from_raw("wild_onion", &parsed["wild_onion"]);
        assert_eq!(item.display_name, "wild onion");
        assert_eq!(item.icon, "wild_onion.png");
        assert_eq!(item.category, ItemCategory::Forage);
        assert_eq!(item.weight, 50);
        assert_eq!(item.experience, 0);
        assert_eq!(item.level_required, 1);
    }

    #[test]
    fn test_seed_category() {
        let toml_str = r#"
            [cabbage_seed]
            category = "seed"
        "#;

        let parsed: HashMap<String, RawItemDefinition> = toml::from_str(toml_str).unwrap();
        assert!(ItemDefinition::from_raw("cabbage_seed", &parsed["cabbage_seed"]).is_seed());
    }
}
