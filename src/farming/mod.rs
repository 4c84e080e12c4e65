//! Farming: seed definitions, plot growth, and the engine that plants and harvests.

mod definition;
mod engine;
mod plot;
mod registry;

pub use definition::{RawSeedDefinition, SeedDefinition};
pub use engine::{FarmEngine, HarvestResult, PlotView, StageAdvance};
pub use plot::{FarmPlot, Planting, PlotState};
pub use registry::SeedRegistry;
