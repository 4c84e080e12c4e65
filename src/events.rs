use serde::Serialize;

use crate::skills::SkillType;

// ============================================================================
// Game Events (engine -> presentation)
// ============================================================================

/// Everything the presentation layer might want to render. Events are queued
/// by the session as actions resolve and drained in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SceneChanged {
        from: String,
        to: String,
    },
    ForageStarted {
        scene: String,
        duration_ms: u64,
        due_at: u64,
    },
    ItemForaged {
        scene: String,
        item_id: String,
        experience: u32,
    },
    ForageFailed {
        scene: String,
        reason: String,
    },
    ItemDiscovered {
        scene: String,
        item_id: String,
        found: usize,
        total: usize,
    },
    LevelUp {
        skill: SkillType,
        old_level: i32,
        new_level: i32,
    },
    InventoryFull {
        item_id: String,
    },
    CropPlanted {
        plot: usize,
        seed_id: String,
    },
    CropStageAdvanced {
        plot: usize,
        stage: u32,
        max_stage: u32,
    },
    CropReady {
        plot: usize,
        seed_id: String,
    },
    Harvested {
        plot: usize,
        crop_id: String,
        quantity: u32,
        experience: i64,
    },
    Deposited {
        item_id: String,
        count: u32,
    },
    Withdrawn {
        item_id: String,
        count: u32,
    },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::SceneChanged { .. } => "scene_changed",
            GameEvent::ForageStarted { .. } => "forage_started",
            GameEvent::ItemForaged { .. } => "item_foraged",
            GameEvent::ForageFailed { .. } => "forage_failed",
            GameEvent::ItemDiscovered { .. } => "item_discovered",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::InventoryFull { .. } => "inventory_full",
            GameEvent::CropPlanted { .. } => "crop_planted",
            GameEvent::CropStageAdvanced { .. } => "crop_stage_advanced",
            GameEvent::CropReady { .. } => "crop_ready",
            GameEvent::Harvested { .. } => "harvested",
            GameEvent::Deposited { .. } => "deposited",
            GameEvent::Withdrawn { .. } => "withdrawn",
        }
    }
}
