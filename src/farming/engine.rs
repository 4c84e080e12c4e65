//! Farm engine: owns the plots, plants from and harvests into an inventory.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::definition::SeedDefinition;
use super::plot::{FarmPlot, PlotState};
use super::registry::SeedRegistry;
use crate::error::{ConfigError, EngineError, ValidationError};
use crate::item::Inventory;
use crate::skills::{LevelUpEvent, ProgressionTrack};

/// A plot moved to a later growth stage during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageAdvance {
    pub plot: usize,
    pub seed_id: String,
    pub stage: u32,
    pub max_stage: u32,
}

impl StageAdvance {
    pub fn is_ready(&self) -> bool {
        self.stage >= self.max_stage
    }
}

/// What a harvest produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestResult {
    pub plot: usize,
    pub crop_id: String,
    pub quantity: u32,
    pub experience: i64,
    pub progress: LevelUpEvent,
}

/// Plot status for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotView {
    pub plot: usize,
    #[serde(flatten)]
    pub state: PlotState,
    pub next_stage_in_ms: Option<u64>,
}

pub struct FarmEngine {
    seeds: Arc<SeedRegistry>,
    plots: Vec<FarmPlot>,
}

impl FarmEngine {
    pub fn new(seeds: Arc<SeedRegistry>, plot_count: usize) -> Self {
        Self {
            seeds,
            plots: (0..plot_count).map(FarmPlot::new).collect(),
        }
    }

    pub fn plots(&self) -> &[FarmPlot] {
        &self.plots
    }

    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    pub fn seeds(&self) -> &SeedRegistry {
        &self.seeds
    }

    fn plot_mut(&mut self, plot: usize) -> Result<&mut FarmPlot, ValidationError> {
        self.plots
            .get_mut(plot)
            .ok_or(ValidationError::NoSuchPlot { plot })
    }

    fn seed_for(&self, plot: &FarmPlot) -> Result<Option<&SeedDefinition>, ConfigError> {
        plot.planting()
            .map(|p| self.seeds.require(&p.seed_id))
            .transpose()
    }

    /// Plant one `seed_id` from the inventory into an empty plot.
    pub fn plant(
        &mut self,
        plot: usize,
        seed_id: &str,
        inventory: &mut Inventory,
        now: u64,
    ) -> Result<(), EngineError> {
        let seed = self.seeds.require(seed_id)?.clone();
        let target = self.plot_mut(plot)?;

        if !target.is_empty() {
            return Err(ValidationError::PlotOccupied { plot }.into());
        }
        if inventory.count_of(seed_id) == 0 {
            return Err(ValidationError::MissingSeed {
                seed_id: seed_id.to_string(),
            }
            .into());
        }

        inventory.remove(seed_id, 1);
        target.plant(&seed, now);
        info!("Planted {} in plot {}", seed_id, plot);
        Ok(())
    }

    /// Bring every plot up to date with `now`.
    pub fn tick(&mut self, now: u64) -> Vec<StageAdvance> {
        let mut advances = Vec::new();
        let seeds = self.seeds.clone();

        for plot in &mut self.plots {
            let Some(seed_id) = plot.planting().map(|p| p.seed_id.clone()) else {
                continue;
            };
            let Some(seed) = seeds.get(&seed_id) else {
                continue;
            };
            if plot.advance(seed, now) > 0 {
                debug!("Plot {} reached stage {}/{}", plot.id(), plot.stage(), seed.max_stage);
                advances.push(StageAdvance {
                    plot: plot.id(),
                    seed_id,
                    stage: plot.stage(),
                    max_stage: seed.max_stage,
                });
            }
        }

        advances
    }

    /// Harvest a fully grown plot: `1..=2*base_yield` crops into the
    /// inventory and `base_experience` per crop into `farming`.
    ///
    /// Readiness is judged on a copy grown to `now`. The plot itself only
    /// advances in `tick`, so every stage change is still reported there.
    pub fn harvest<R: Rng + ?Sized>(
        &mut self,
        plot: usize,
        inventory: &mut Inventory,
        farming: &mut ProgressionTrack,
        rng: &mut R,
        now: u64,
    ) -> Result<HarvestResult, EngineError> {
        let seeds = self.seeds.clone();
        let target = self.plot_mut(plot)?;

        let seed_id = match target.planting() {
            Some(p) => p.seed_id.clone(),
            None => return Err(ValidationError::PlotEmpty { plot }.into()),
        };
        let seed = seeds.require(&seed_id)?;

        let mut grown = target.clone();
        grown.advance(seed, now);
        if !grown.is_ready(seed) {
            return Err(ValidationError::PlotNotReady {
                plot,
                stage: grown.stage(),
                max_stage: seed.max_stage,
            }
            .into());
        }

        let quantity = rng.gen_range(1..=seed.max_yield());
        if !inventory.add(&seed.crop_id, quantity) {
            return Err(ValidationError::InventoryFull {
                item_id: seed.crop_id.clone(),
            }
            .into());
        }

        target.reset();
        let experience = i64::from(seed.base_experience) * i64::from(quantity);
        let progress = farming.apply(experience);

        info!(
            "Harvested {} x{} from plot {} (+{} farming xp)",
            seed.crop_id, quantity, plot, experience
        );

        Ok(HarvestResult {
            plot,
            crop_id: seed.crop_id.clone(),
            quantity,
            experience,
            progress,
        })
    }

    pub fn plot_state(&self, plot: usize) -> Result<PlotState, ValidationError> {
        let target = self
            .plots
            .get(plot)
            .ok_or(ValidationError::NoSuchPlot { plot })?;
        Ok(target.state(self.seeds.get(target.planting().map_or("", |p| p.seed_id.as_str()))))
    }

    /// Every plot as the player would see it at `now` (without mutating).
    pub fn views(&self, now: u64) -> Vec<PlotView> {
        self.plots
            .iter()
            .map(|plot| {
                let seed = self.seed_for(plot).ok().flatten();
                let (state, next_stage_in_ms) = match seed {
                    Some(seed) => {
                        let mut projected = plot.clone();
                        projected.advance(seed, now);
                        (projected.state(Some(seed)), projected.time_to_next_stage(seed, now))
                    }
                    None => (PlotState::Empty, None),
                };
                PlotView {
                    plot: plot.id(),
                    state,
                    next_stage_in_ms,
                }
            })
            .collect()
    }
}
