//! Scenes
//!
//! Static locations the player moves between, each with its own loot table.

pub mod definition;
pub mod registry;

pub use definition::{RawSceneDefinition, Scene};
pub use registry::SceneRegistry;
