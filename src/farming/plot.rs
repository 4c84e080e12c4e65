//! Farm plot growth state machine.
//!
//! Empty -> Growing(stage 1) on planting, stage N -> N+1 once the stage's
//! duration has elapsed on the wall clock, back to Empty on harvest. Growth is
//! derived purely from timestamps, so a plot nobody looks at keeps growing.

use serde::Serialize;

use super::definition::SeedDefinition;

/// A seed in the ground
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planting {
    pub seed_id: String,
    pub stage: u32,
    pub stage_entered_at: u64,
}

/// What a plot is doing right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlotState {
    Empty,
    Growing {
        seed_id: String,
        stage: u32,
        max_stage: u32,
    },
    Ready {
        seed_id: String,
        max_stage: u32,
    },
}

#[derive(Debug, Clone)]
pub struct FarmPlot {
    id: usize,
    planting: Option<Planting>,
}

impl FarmPlot {
    pub fn new(id: usize) -> Self {
        Self { id, planting: None }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn planting(&self) -> Option<&Planting> {
        self.planting.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.planting.is_none()
    }

    pub fn stage(&self) -> u32 {
        self.planting.as_ref().map_or(0, |p| p.stage)
    }

    /// Put a seed in the ground at stage 1. Caller checks the plot is empty.
    pub(crate) fn plant(&mut self, seed: &SeedDefinition, now: u64) {
        self.planting = Some(Planting {
            seed_id: seed.id.clone(),
            stage: 1,
            stage_entered_at: now,
        });
    }

    /// Advance through every stage whose duration has fully elapsed by `now`.
    /// Each stage starts when the previous one was due, not when it was
    /// noticed, so catching up after a long gap lands on the same stage as
    /// ticking continuously. Returns the number of stages gained.
    pub fn advance(&mut self, seed: &SeedDefinition, now: u64) -> u32 {
        let Some(planting) = self.planting.as_mut() else {
            return 0;
        };

        let mut advanced = 0;
        while planting.stage < seed.max_stage {
            let Some(duration) = seed.stage_duration_ms(planting.stage) else {
                break;
            };
            if now.saturating_sub(planting.stage_entered_at) < duration {
                break;
            }
            planting.stage_entered_at += duration;
            planting.stage += 1;
            advanced += 1;
        }
        advanced
    }

    pub fn is_ready(&self, seed: &SeedDefinition) -> bool {
        self.planting
            .as_ref()
            .is_some_and(|p| p.seed_id == seed.id && p.stage >= seed.max_stage)
    }

    /// Milliseconds until the next stage, `None` when empty or fully grown.
    pub fn time_to_next_stage(&self, seed: &SeedDefinition, now: u64) -> Option<u64> {
        let planting = self.planting.as_ref()?;
        let duration = seed.stage_duration_ms(planting.stage)?;
        let elapsed = now.saturating_sub(planting.stage_entered_at);
        Some(duration.saturating_sub(elapsed))
    }

    pub fn state(&self, seed: Option<&SeedDefinition>) -> PlotState {
        match (&self.planting, seed) {
            (None, _) | (Some(_), None) => PlotState::Empty,
            (Some(p), Some(seed)) if p.stage >= seed.max_stage => PlotState::Ready {
                seed_id: p.seed_id.clone(),
                max_stage: seed.max_stage,
            },
            (Some(p), Some(seed)) => PlotState::Growing {
                seed_id: p.seed_id.clone(),
                stage: p.stage,
                max_stage: seed.max_stage,
            },
        }
    }

    /// Clear the plot, dropping any pending growth.
    pub(crate) fn reset(&mut self) -> Option<Planting> {
        self.planting.take()
    }
}
