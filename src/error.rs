//! Error taxonomy for the engine.
//!
//! `ValidationError` covers everything a player can cause and correct (full
//! inventory, bad amounts, unready plots). `ConfigError` covers malformed
//! static data and programmer mistakes; those should surface at startup.

use std::path::PathBuf;

use thiserror::Error;

/// User-correctable rejection of an action. Never fatal; the state the action
/// targeted is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("inventory is full, no free slot for '{item_id}'")]
    InventoryFull { item_id: String },

    #[error("invalid amount {requested} of '{item_id}' (available: {available})")]
    InvalidAmount {
        item_id: String,
        requested: u32,
        available: u32,
    },

    #[error("cannot add {count} more '{item_id}', the stack would overflow")]
    StackOverflow { item_id: String, count: u32 },

    #[error("'{item_id}' is not held")]
    ItemNotHeld { item_id: String },

    #[error("there is no farm plot {plot}")]
    NoSuchPlot { plot: usize },

    #[error("farm plot {plot} is already planted")]
    PlotOccupied { plot: usize },

    #[error("farm plot {plot} has nothing planted")]
    PlotEmpty { plot: usize },

    #[error("farm plot {plot} is not ready to harvest (stage {stage}/{max_stage})")]
    PlotNotReady {
        plot: usize,
        stage: u32,
        max_stage: u32,
    },

    #[error("no '{seed_id}' in inventory to plant")]
    MissingSeed { seed_id: String },

    #[error("foraging level {level} is too low to find anything in '{scene}'")]
    NoEligibleLoot { scene: String, level: i32 },

    #[error("already foraging")]
    ForageInProgress,

    #[error("not currently foraging")]
    NoForageInProgress,

    #[error("still foraging, {remaining_ms}ms remaining")]
    ForageNotFinished { remaining_ms: u64 },

    #[error("'{to}' cannot be reached from '{from}'")]
    NotAdjacent { from: String, to: String },

    #[error("bank actions are only available at a bank (currently in '{scene}')")]
    NotAtBank { scene: String },

    #[error("farming actions are only available at a farm (currently in '{scene}')")]
    NotAtFarm { scene: String },
}

/// Malformed static data or an out-of-range lookup that indicates a bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("level {level} is outside the experience table (1..={max_level})")]
    LevelOutOfRange { level: i32, max_level: i32 },

    #[error("level {level} is the maximum level, there is no next level")]
    NoNextLevel { level: i32 },

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("unknown seed '{0}'")]
    UnknownSeed(String),

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("invalid experience table: {0}")]
    InvalidExperienceTable(String),

    #[error("invalid seed '{seed_id}': {reason}")]
    InvalidSeed { seed_id: String, reason: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to load {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
}

impl ConfigError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConfigError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Either kind of failure, for operations that can hit both.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// The validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            EngineError::Validation(e) => Some(e),
            EngineError::Config(_) => None,
        }
    }
}
