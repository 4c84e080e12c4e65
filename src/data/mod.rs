pub mod game_data;
pub mod item_def;
pub mod item_registry;

pub use game_data::GameData;
pub use item_def::{ItemCategory, ItemDefinition, RawItemDefinition};
pub use item_registry::ItemRegistry;
