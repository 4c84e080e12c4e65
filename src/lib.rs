//! Progression and stateful-entity engine for an idle foraging and farming game.
//!
//! The library is presentation-agnostic: every operation is a synchronous
//! transformation of plain data, time is passed in as milliseconds, and
//! results come back as values or structured errors. `runtime` adds the async
//! shell (shared session, event broadcast, tick loop).

pub mod bank;
pub mod clock;
pub mod collection;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod farming;
pub mod game;
pub mod item;
pub mod loot;
pub mod runtime;
pub mod scene;
pub mod skills;

pub use bank::BankLedger;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ForagingTiming, GameConfig};
pub use data::GameData;
pub use error::{ConfigError, EngineError, ValidationError};
pub use events::GameEvent;
pub use game::{ForageResult, GameSession, SessionSnapshot};
pub use item::{Inventory, ItemStack};
pub use runtime::GameHandle;
pub use skills::{ExperienceTable, LevelUpEvent, ProgressionTrack, SkillType};
