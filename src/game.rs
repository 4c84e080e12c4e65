//! Game session: the single actor every player action and tick goes through.
//!
//! `GameSession` owns the player's scene, inventory, bank, skills and farm.
//! Each action validates against that state, applies its changes, and queues
//! `GameEvent`s for the caller to drain.

use serde::Serialize;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bank::BankLedger;
use crate::collection::CollectionLog;
use crate::config::{ForagingTiming, GameConfig};
use crate::data::GameData;
use crate::error::{ConfigError, EngineError, ValidationError};
use crate::events::GameEvent;
use crate::farming::{FarmEngine, HarvestResult, PlotState, PlotView};
use crate::item::{Inventory, InventorySlotView, ItemStack};
use crate::loot;
use crate::scene::Scene;
use crate::skills::{LevelUpEvent, SkillType, Skills};

// ============================================================================
// Foraging State
// ============================================================================

/// A forage that has been started and not yet resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingForage {
    pub scene: String,
    pub started_at: u64,
    pub due_at: u64,
}

/// A successfully resolved forage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForageResult {
    pub scene: String,
    pub item_id: String,
    pub experience: u32,
    pub progress: LevelUpEvent,
    /// First time this item turned up in this scene
    pub discovered: bool,
}

// ============================================================================
// Snapshot (for presentation)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SkillView {
    pub skill: SkillType,
    pub level: i32,
    pub xp: i64,
    pub xp_to_next_level: i64,
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForagingView {
    pub scene: String,
    pub due_at: u64,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub now: u64,
    pub scene: String,
    pub scene_name: String,
    pub adjacent: Vec<String>,
    pub at_bank: bool,
    pub at_farm: bool,
    pub skills: Vec<SkillView>,
    pub inventory: Vec<InventorySlotView>,
    pub inventory_capacity: usize,
    pub bank: Vec<ItemStack>,
    pub plots: Vec<PlotView>,
    pub foraging: Option<ForagingView>,
    /// (found, total) for the current scene's loot table
    pub collection: (usize, usize),
}

// ============================================================================
// Game Session
// ============================================================================

/// One player's game: the single logical actor every action goes through.
/// Methods never read the clock themselves; `now` is always passed in.
pub struct GameSession {
    data: Arc<GameData>,
    timing: ForagingTiming,
    scene_id: String,
    inventory: Inventory,
    bank: BankLedger,
    skills: Skills,
    farm: FarmEngine,
    collection: CollectionLog,
    foraging: Option<PendingForage>,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(data: Arc<GameData>, config: &GameConfig) -> Result<Self, ConfigError> {
        data.scenes.require(&config.starting_scene)?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            "New session in '{}' ({} inventory slots, {} farm plots)",
            config.starting_scene,
            config.inventory_capacity,
            config.farm_plots
        );

        Ok(Self {
            timing: config.foraging,
            scene_id: config.starting_scene.clone(),
            inventory: Inventory::with_capacity(config.inventory_capacity),
            bank: BankLedger::new(),
            skills: Skills::new(data.xp_table.clone()),
            farm: FarmEngine::new(data.seeds.clone(), config.farm_plots),
            collection: CollectionLog::new(),
            foraging: None,
            rng,
            events: Vec::new(),
            data,
        })
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn current_scene(&self) -> Result<&Scene, ConfigError> {
        self.data.scenes.require(&self.scene_id)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn bank(&self) -> &BankLedger {
        &self.bank
    }

    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn farm(&self) -> &FarmEngine {
        &self.farm
    }

    pub fn collection(&self) -> &CollectionLog {
        &self.collection
    }

    pub fn foraging(&self) -> Option<&PendingForage> {
        self.foraging.as_ref()
    }

    pub fn is_foraging(&self) -> bool {
        self.foraging.is_some()
    }

    /// Hand queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        tracing::debug!("Event: {:?}", event);
        self.events.push(event);
    }

    fn emit_level_up(&mut self, skill: SkillType, progress: &LevelUpEvent) {
        if progress.is_level_up() {
            tracing::info!(
                "{} leveled up to {} (from {})",
                skill.as_str(),
                progress.new_level,
                progress.old_level
            );
            self.emit(GameEvent::LevelUp {
                skill,
                old_level: progress.old_level,
                new_level: progress.new_level,
            });
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Scenes reachable from the current one
    pub fn adjacent_scenes(&self) -> &[String] {
        self.data
            .scenes
            .get(&self.scene_id)
            .map(|scene| scene.adjacent.as_slice())
            .unwrap_or_default()
    }

    pub fn move_to(&mut self, scene_id: &str) -> Result<(), EngineError> {
        if self.foraging.is_some() {
            return Err(ValidationError::ForageInProgress.into());
        }

        let data = self.data.clone();
        data.scenes.require(scene_id)?;
        let current = data.scenes.require(&self.scene_id)?;
        if !current.is_adjacent(scene_id) {
            return Err(ValidationError::NotAdjacent {
                from: self.scene_id.clone(),
                to: scene_id.to_string(),
            }
            .into());
        }

        tracing::info!("Moved from '{}' to '{}'", self.scene_id, scene_id);
        let from = std::mem::replace(&mut self.scene_id, scene_id.to_string());
        self.emit(GameEvent::SceneChanged {
            from,
            to: scene_id.to_string(),
        });
        Ok(())
    }

    // ========================================================================
    // Foraging
    // ========================================================================

    /// Start foraging in the current scene. Returns when it will be done.
    pub fn begin_forage(&mut self, now: u64) -> Result<u64, EngineError> {
        if self.foraging.is_some() {
            return Err(ValidationError::ForageInProgress.into());
        }

        let data = self.data.clone();
        let scene = data.scenes.require(&self.scene_id)?;
        let level = self.skills.foraging.level();

        if loot::eligible_weight(&scene.loot, level) == 0 {
            return Err(ValidationError::NoEligibleLoot {
                scene: scene.id.clone(),
                level,
            }
            .into());
        }

        let duration_ms = loot::forage_duration_ms(scene.difficulty, level, &self.timing);
        let due_at = now.saturating_add(duration_ms);
        self.foraging = Some(PendingForage {
            scene: scene.id.clone(),
            started_at: now,
            due_at,
        });

        tracing::debug!("Foraging in '{}' for {}ms", scene.id, duration_ms);
        self.emit(GameEvent::ForageStarted {
            scene: scene.id.clone(),
            duration_ms,
            due_at,
        });
        Ok(due_at)
    }

    /// Resolve the outstanding forage: one weighted draw, one item into the
    /// inventory, its experience into the foraging track.
    pub fn finish_forage(&mut self, now: u64) -> Result<ForageResult, EngineError> {
        let due_at = match &self.foraging {
            Some(pending) => pending.due_at,
            None => return Err(ValidationError::NoForageInProgress.into()),
        };
        if now < due_at {
            return Err(ValidationError::ForageNotFinished {
                remaining_ms: due_at - now,
            }
            .into());
        }
        let Some(pending) = self.foraging.take() else {
            return Err(ValidationError::NoForageInProgress.into());
        };

        let data = self.data.clone();
        let scene = data.scenes.require(&pending.scene)?;
        let level = self.skills.foraging.level();

        let Some(item) = loot::resolve(&scene.loot, level, &mut self.rng) else {
            let err = ValidationError::NoEligibleLoot {
                scene: scene.id.clone(),
                level,
            };
            self.emit(GameEvent::ForageFailed {
                scene: scene.id.clone(),
                reason: err.to_string(),
            });
            return Err(err.into());
        };

        if !self.inventory.add(&item.id, 1) {
            let err = ValidationError::InventoryFull {
                item_id: item.id.clone(),
            };
            self.emit(GameEvent::InventoryFull {
                item_id: item.id.clone(),
            });
            self.emit(GameEvent::ForageFailed {
                scene: scene.id.clone(),
                reason: err.to_string(),
            });
            return Err(err.into());
        }

        let progress = self.skills.foraging.apply(i64::from(item.experience));
        tracing::info!(
            "Foraged {} in '{}' (+{} foraging xp)",
            item.display_name,
            scene.id,
            item.experience
        );
        self.emit(GameEvent::ItemForaged {
            scene: scene.id.clone(),
            item_id: item.id.clone(),
            experience: item.experience,
        });
        self.emit_level_up(SkillType::Foraging, &progress);

        let discovered = self.collection.record(&scene.id, &item.id);
        if discovered {
            let (found, total) = self.collection.progress(&scene.id, scene.loot.len());
            self.emit(GameEvent::ItemDiscovered {
                scene: scene.id.clone(),
                item_id: item.id.clone(),
                found,
                total,
            });
        }

        Ok(ForageResult {
            scene: scene.id.clone(),
            item_id: item.id.clone(),
            experience: item.experience,
            progress,
            discovered,
        })
    }

    // ========================================================================
    // Inventory & Bank
    // ========================================================================

    fn require_bank(&self) -> Result<(), EngineError> {
        let scene = self.current_scene()?;
        if !scene.bank {
            return Err(ValidationError::NotAtBank {
                scene: scene.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    fn require_farm(&self) -> Result<(), EngineError> {
        let scene = self.current_scene()?;
        if !scene.farm {
            return Err(ValidationError::NotAtFarm {
                scene: scene.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn deposit(&mut self, item_id: &str, count: u32) -> Result<u32, EngineError> {
        self.require_bank()?;
        let moved = self.bank.deposit_from(&mut self.inventory, item_id, count)?;
        self.emit(GameEvent::Deposited {
            item_id: item_id.to_string(),
            count: moved,
        });
        Ok(moved)
    }

    pub fn deposit_all(&mut self) -> Result<Vec<ItemStack>, EngineError> {
        self.require_bank()?;
        let moved = self.bank.deposit_all(&mut self.inventory)?;
        for stack in &moved {
            self.emit(GameEvent::Deposited {
                item_id: stack.item_id.clone(),
                count: stack.count,
            });
        }
        Ok(moved)
    }

    pub fn withdraw(&mut self, item_id: &str, count: u32) -> Result<u32, EngineError> {
        self.require_bank()?;
        let moved = self.bank.withdraw(&mut self.inventory, item_id, count)?;
        self.emit(GameEvent::Withdrawn {
            item_id: item_id.to_string(),
            count: moved,
        });
        Ok(moved)
    }

    pub fn withdraw_all(&mut self, item_id: &str) -> Result<u32, EngineError> {
        let held = self.bank.count_of(item_id);
        self.withdraw(item_id, held)
    }

    /// Throw items away.
    pub fn drop_item(&mut self, item_id: &str, count: u32) -> Result<u32, ValidationError> {
        let held = self.inventory.count_of(item_id);
        if held == 0 {
            return Err(ValidationError::ItemNotHeld {
                item_id: item_id.to_string(),
            });
        }
        if count == 0 || count > held {
            return Err(ValidationError::InvalidAmount {
                item_id: item_id.to_string(),
                requested: count,
                available: held,
            });
        }
        tracing::debug!("Dropped {} x{}", item_id, count);
        Ok(self.inventory.remove(item_id, count))
    }

    /// Distinct plantable seeds currently held, in slot order
    pub fn seeds_in_inventory(&self) -> Vec<String> {
        self.inventory
            .stacks()
            .filter(|stack| self.data.seeds.contains(&stack.item_id))
            .map(|stack| stack.item_id.clone())
            .collect()
    }

    // ========================================================================
    // Farming
    // ========================================================================

    pub fn plant(&mut self, plot: usize, seed_id: &str, now: u64) -> Result<(), EngineError> {
        self.require_farm()?;
        self.farm.plant(plot, seed_id, &mut self.inventory, now)?;
        self.emit(GameEvent::CropPlanted {
            plot,
            seed_id: seed_id.to_string(),
        });
        if matches!(self.farm.plot_state(plot), Ok(PlotState::Ready { .. })) {
            self.emit(GameEvent::CropReady {
                plot,
                seed_id: seed_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn harvest(&mut self, plot: usize, now: u64) -> Result<HarvestResult, EngineError> {
        self.require_farm()?;
        let result = self.farm.harvest(
            plot,
            &mut self.inventory,
            &mut self.skills.farming,
            &mut self.rng,
            now,
        );

        match result {
            Ok(harvest) => {
                self.emit(GameEvent::Harvested {
                    plot,
                    crop_id: harvest.crop_id.clone(),
                    quantity: harvest.quantity,
                    experience: harvest.experience,
                });
                self.emit_level_up(SkillType::Farming, &harvest.progress);
                Ok(harvest)
            }
            Err(EngineError::Validation(ValidationError::InventoryFull { item_id })) => {
                self.emit(GameEvent::InventoryFull {
                    item_id: item_id.clone(),
                });
                Err(ValidationError::InventoryFull { item_id }.into())
            }
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance everything time-driven to `now`: farm plots grow, and a due
    /// forage is resolved.
    pub fn tick(&mut self, now: u64) {
        for advance in self.farm.tick(now) {
            self.emit(GameEvent::CropStageAdvanced {
                plot: advance.plot,
                stage: advance.stage,
                max_stage: advance.max_stage,
            });
            if advance.is_ready() {
                tracing::info!("Plot {} is ready to harvest", advance.plot);
                self.emit(GameEvent::CropReady {
                    plot: advance.plot,
                    seed_id: advance.seed_id,
                });
            }
        }

        if self.foraging.as_ref().is_some_and(|f| f.due_at <= now) {
            if let Err(e) = self.finish_forage(now) {
                tracing::debug!("Forage finished without an item: {}", e);
            }
        }
    }

    pub fn snapshot(&self, now: u64) -> SessionSnapshot {
        let scene = self.data.scenes.get(&self.scene_id);
        let skills = [SkillType::Foraging, SkillType::Farming]
            .into_iter()
            .map(|skill| {
                let track = self.skills.get(skill);
                SkillView {
                    skill,
                    level: track.level(),
                    xp: track.xp(),
                    xp_to_next_level: track.xp_to_next_level(),
                    progress: track.progress(),
                }
            })
            .collect();

        SessionSnapshot {
            now,
            scene: self.scene_id.clone(),
            scene_name: scene.map_or_else(|| self.scene_id.clone(), |s| s.display_name.clone()),
            adjacent: self.adjacent_scenes().to_vec(),
            at_bank: scene.is_some_and(|s| s.bank),
            at_farm: scene.is_some_and(|s| s.farm),
            skills,
            inventory: self.inventory.slots(),
            inventory_capacity: self.inventory.capacity(),
            bank: self.bank.stacks().cloned().collect(),
            plots: self.farm.views(now),
            foraging: self.foraging.as_ref().map(|f| ForagingView {
                scene: f.scene.clone(),
                due_at: f.due_at,
                remaining_ms: f.due_at.saturating_sub(now),
            }),
            collection: self
                .collection
                .progress(&self.scene_id, scene.map_or(0, |s| s.loot.len())),
        }
    }
}
