//! Gathering skills following RuneScape-style experience curves.
//!
//! Skills: Foraging, Farming
//! - Both share one cumulative experience table (level 2 = 83 XP, level 99 cap)
//! - Experience is stored relative to the current level's floor, so a level-up
//!   carries the excess forward instead of resetting the bar to zero

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Maximum skill level of the standard table
pub const MAX_LEVEL: i32 = 99;

/// Calculate total XP required to reach a level using the RuneScape formula.
/// Level 1 = 0 XP, Level 2 = 83 XP, Level 3 = 174 XP
pub fn total_xp_for_level(level: i32) -> i64 {
    if level <= 1 {
        return 0;
    }
    let mut total = 0.0;
    for l in 1..level {
        total += (l as f64 + 300.0 * 2.0_f64.powf(l as f64 / 7.0)) / 4.0;
    }
    total.floor() as i64
}

// ============================================================================
// Experience Table
// ============================================================================

/// Cumulative experience breakpoints indexed by level (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceTable {
    thresholds: Vec<i64>,
}

impl ExperienceTable {
    /// The formula table, levels 1..=99.
    pub fn standard() -> Self {
        Self {
            thresholds: (1..=MAX_LEVEL).map(total_xp_for_level).collect(),
        }
    }

    /// Build a table from explicit cumulative thresholds, `thresholds[0]` being level 1.
    pub fn from_thresholds(thresholds: Vec<i64>) -> Result<Self, ConfigError> {
        if thresholds.is_empty() {
            return Err(ConfigError::InvalidExperienceTable(
                "table has no levels".to_string(),
            ));
        }
        if thresholds[0] != 0 {
            return Err(ConfigError::InvalidExperienceTable(format!(
                "level 1 must start at 0 XP, got {}",
                thresholds[0]
            )));
        }
        if let Some(i) = thresholds.windows(2).position(|w| w[1] < w[0]) {
            return Err(ConfigError::InvalidExperienceTable(format!(
                "threshold for level {} ({}) is below level {} ({})",
                i + 2,
                thresholds[i + 1],
                i + 1,
                thresholds[i]
            )));
        }
        if i32::try_from(thresholds.len()).is_err() {
            return Err(ConfigError::InvalidExperienceTable(
                "too many levels".to_string(),
            ));
        }
        Ok(Self { thresholds })
    }

    pub fn max_level(&self) -> i32 {
        self.thresholds.len() as i32
    }

    /// Cumulative XP at which `level` is reached.
    pub fn threshold_for_level(&self, level: i32) -> Result<i64, ConfigError> {
        if level < 1 || level > self.max_level() {
            return Err(ConfigError::LevelOutOfRange {
                level,
                max_level: self.max_level(),
            });
        }
        Ok(self.thresholds[(level - 1) as usize])
    }

    /// Highest level whose threshold does not exceed `xp`, scanning upward from
    /// `starting_level`. Never returns less than `starting_level` and saturates
    /// at the maximum level.
    pub fn level_for_experience(&self, xp: i64, starting_level: i32) -> i32 {
        let max = self.max_level();
        let mut level = starting_level.clamp(1, max);
        while level < max && self.thresholds[level as usize] <= xp {
            level += 1;
        }
        level
    }

    /// XP still needed to go from `xp` (cumulative) to the level after `level`.
    pub fn remaining_to_next_level(&self, xp: i64, level: i32) -> Result<i64, ConfigError> {
        let max_level = self.max_level();
        if level == max_level {
            return Err(ConfigError::NoNextLevel { level });
        }
        if level < 1 || level > max_level {
            return Err(ConfigError::LevelOutOfRange { level, max_level });
        }
        Ok(self.thresholds[level as usize] - xp)
    }
}

impl Default for ExperienceTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Progression Track
// ============================================================================

/// Skill types tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Foraging,
    Farming,
}

impl SkillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillType::Foraging => "foraging",
            SkillType::Farming => "farming",
        }
    }
}

/// Outcome of applying experience to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelUpEvent {
    pub old_level: i32,
    pub new_level: i32,
    /// Experience earned since reaching `new_level`
    pub xp_in_level: i64,
    /// Experience still needed for the next level (0 at the maximum level)
    pub remaining_to_next: i64,
}

impl LevelUpEvent {
    pub fn is_level_up(&self) -> bool {
        self.new_level > self.old_level
    }
}

/// Level and experience for one skill
#[derive(Debug, Clone)]
pub struct ProgressionTrack {
    table: Arc<ExperienceTable>,
    level: i32,
    xp: i64,
}

impl ProgressionTrack {
    /// A fresh track at level 1 with no experience.
    pub fn new(table: Arc<ExperienceTable>) -> Self {
        Self {
            table,
            level: 1,
            xp: 0,
        }
    }

    /// Start at `level` with `xp` already earned inside that level.
    pub fn at_level(table: Arc<ExperienceTable>, level: i32, xp: i64) -> Result<Self, ConfigError> {
        table.threshold_for_level(level)?;
        let mut track = Self { table, level, xp: 0 };
        track.apply(xp);
        Ok(track)
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Experience earned since reaching the current level
    pub fn xp(&self) -> i64 {
        self.xp
    }

    pub fn table(&self) -> &ExperienceTable {
        &self.table
    }

    fn floor(&self) -> i64 {
        self.table.thresholds[(self.level - 1) as usize]
    }

    /// Absolute (cumulative) experience
    pub fn total_xp(&self) -> i64 {
        self.floor() + self.xp
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.table.max_level()
    }

    /// Add experience, levelling up as many times as the gain allows.
    pub fn apply(&mut self, amount: i64) -> LevelUpEvent {
        let old_level = self.level;

        if amount > 0 {
            let total = self.total_xp().saturating_add(amount);
            let new_level = self.table.level_for_experience(total, self.level);
            self.level = new_level;
            self.xp = total - self.floor();
        } else if amount < 0 {
            debug!("Ignoring negative experience gain {}", amount);
        }

        LevelUpEvent {
            old_level,
            new_level: self.level,
            xp_in_level: self.xp,
            remaining_to_next: self.xp_to_next_level(),
        }
    }

    /// XP needed to reach the next level
    pub fn xp_to_next_level(&self) -> i64 {
        self.table
            .remaining_to_next_level(self.total_xp(), self.level)
            .unwrap_or(0)
    }

    /// XP progress within current level (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.is_max_level() {
            return 1.0;
        }
        let span = self.table.thresholds[self.level as usize] - self.floor();
        if span <= 0 {
            return 1.0;
        }
        (self.xp as f32 / span as f32).clamp(0.0, 1.0)
    }
}

/// All gathering skills for a player
#[derive(Debug, Clone)]
pub struct Skills {
    pub foraging: ProgressionTrack,
    pub farming: ProgressionTrack,
}

impl Skills {
    pub fn new(table: Arc<ExperienceTable>) -> Self {
        Self {
            foraging: ProgressionTrack::new(table.clone()),
            farming: ProgressionTrack::new(table),
        }
    }

    /// Get a skill by type
    pub fn get(&self, skill_type: SkillType) -> &ProgressionTrack {
        match skill_type {
            SkillType::Foraging => &self.foraging,
            SkillType::Farming => &self.farming,
        }
    }

    /// Get a mutable skill by type
    pub fn get_mut(&mut self, skill_type: SkillType) -> &mut ProgressionTrack {
        match skill_type {
            SkillType::Foraging => &mut self.foraging,
            SkillType::Farming => &mut self.farming,
        }
    }

    /// Total level (sum of all skill levels)
    pub fn total_level(&self) -> i32 {
        self.foraging.level() + self.farming.level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<ExperienceTable> {
        Arc::new(ExperienceTable::standard())
    }

    #[test]
    fn test_xp_table() {
        let table = ExperienceTable::standard();
        assert_eq!(table.max_level(), 99);
        assert_eq!(table.threshold_for_level(1).unwrap(), 0);
        assert_eq!(table.threshold_for_level(2).unwrap(), 83);
        assert_eq!(table.threshold_for_level(3).unwrap(), 174);
        assert!(table.threshold_for_level(10).unwrap() > 1000);
        assert!(table.threshold_for_level(99).unwrap() > 13_000_000);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let table = ExperienceTable::standard();
        assert_eq!(
            table.threshold_for_level(0),
            Err(ConfigError::LevelOutOfRange { level: 0, max_level: 99 })
        );
        assert!(table.threshold_for_level(100).is_err());
    }

    #[test]
    fn test_level_for_xp() {
        let table = ExperienceTable::standard();
        assert_eq!(table.level_for_experience(0, 1), 1);
        assert_eq!(table.level_for_experience(82, 1), 1);
        assert_eq!(table.level_for_experience(83, 1), 2);
        assert_eq!(table.level_for_experience(100, 1), 2);

        // Round-trip test
        for level in 1..=99 {
            let xp = table.threshold_for_level(level).unwrap();
            assert_eq!(table.level_for_experience(xp, 1), level);
        }
    }

    #[test]
    fn test_level_for_xp_saturates() {
        let table = ExperienceTable::standard();
        assert_eq!(table.level_for_experience(i64::MAX, 1), 99);
        // Scanning starts at the given level and never goes below it
        assert_eq!(table.level_for_experience(0, 5), 5);
    }

    #[test]
    fn test_remaining_to_next_level() {
        let table = ExperienceTable::standard();
        assert_eq!(table.remaining_to_next_level(0, 1).unwrap(), 83);
        assert_eq!(table.remaining_to_next_level(100, 2).unwrap(), 74);
        assert!(table.remaining_to_next_level(0, 0).is_err());
    }

    #[test]
    fn test_no_next_level_after_max() {
        let table = ExperienceTable::standard();
        let at_max = table.remaining_to_next_level(0, 99).unwrap_err();
        assert_eq!(at_max, ConfigError::NoNextLevel { level: 99 });
        assert_eq!(at_max.to_string(), "level 99 is the maximum level, there is no next level");

        let beyond = table.remaining_to_next_level(0, 100).unwrap_err();
        assert_eq!(beyond, ConfigError::LevelOutOfRange { level: 100, max_level: 99 });
        assert_eq!(beyond.to_string(), "level 100 is outside the experience table (1..=99)");
    }

    #[test]
    fn test_custom_table_validation() {
        assert!(ExperienceTable::from_thresholds(vec![]).is_err());
        assert!(ExperienceTable::from_thresholds(vec![5, 10]).is_err());
        assert!(ExperienceTable::from_thresholds(vec![0, 10, 9]).is_err());

        // Equal neighbours are allowed
        let table = ExperienceTable::from_thresholds(vec![0, 10, 10, 30]).unwrap();
        assert_eq!(table.max_level(), 4);
        assert_eq!(table.level_for_experience(10, 1), 3);
    }

    #[test]
    fn test_apply_scenario() {
        let mut track = ProgressionTrack::new(table());
        assert_eq!((track.level(), track.xp()), (1, 0));

        let event = track.apply(83);
        assert!(event.is_level_up());
        assert_eq!((event.old_level, event.new_level), (1, 2));
        assert_eq!((track.level(), track.xp()), (2, 0));
        assert_eq!(event.remaining_to_next, 91);

        let event = track.apply(50);
        assert!(!event.is_level_up());
        assert_eq!((track.level(), track.xp()), (2, 50));
        assert_eq!(event.remaining_to_next, 41);
    }

    #[test]
    fn test_apply_carries_excess() {
        let mut track = ProgressionTrack::new(table());
        let event = track.apply(100);
        assert_eq!(event.new_level, 2);
        assert_eq!(track.xp(), 17);
        assert_eq!(track.total_xp(), 100);
    }

    #[test]
    fn test_apply_multiple_levels() {
        let table = table();
        let mut track = ProgressionTrack::new(table.clone());
        let target = table.threshold_for_level(10).unwrap() + 5;
        let event = track.apply(target);
        assert_eq!((event.old_level, event.new_level), (1, 10));
        assert_eq!(track.xp(), 5);
    }

    #[test]
    fn test_apply_invariants_hold_over_many_gains() {
        let table = table();
        let mut track = ProgressionTrack::new(table.clone());
        let mut last_level = track.level();
        for gain in (1..400).map(|i| (i * 37 % 500) as i64) {
            track.apply(gain);
            assert!(track.level() >= last_level);
            assert!(track.xp() >= 0);
            if !track.is_max_level() {
                let span = table.threshold_for_level(track.level() + 1).unwrap()
                    - table.threshold_for_level(track.level()).unwrap();
                assert!(track.xp() < span);
            }
            last_level = track.level();
        }
    }

    #[test]
    fn test_max_level_accumulates() {
        let table = table();
        let mut track = ProgressionTrack::at_level(table.clone(), 99, 0).unwrap();
        let event = track.apply(1_000);
        assert!(!event.is_level_up());
        assert_eq!(track.level(), 99);
        assert_eq!(track.xp(), 1_000);
        assert_eq!(event.remaining_to_next, 0);
        assert_eq!(track.progress(), 1.0);
    }

    #[test]
    fn test_non_positive_gain_is_noop() {
        let mut track = ProgressionTrack::new(table());
        track.apply(40);
        let event = track.apply(-10);
        assert_eq!(track.xp(), 40);
        assert_eq!(event.old_level, event.new_level);
        track.apply(0);
        assert_eq!(track.xp(), 40);
    }

    #[test]
    fn test_progress() {
        let mut track = ProgressionTrack::new(table());
        assert_eq!(track.progress(), 0.0);
        track.apply(83 + 91 / 2);
        assert!((track.progress() - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_skills() {
        let mut skills = Skills::new(table());
        assert_eq!(skills.total_level(), 2);
        skills.get_mut(SkillType::Farming).apply(200);
        assert_eq!(skills.get(SkillType::Farming).level(), 3);
        assert_eq!(skills.get(SkillType::Foraging).level(), 1);
        assert_eq!(skills.total_level(), 4);
    }
}
