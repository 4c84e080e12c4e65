//! Weighted loot draws for foraging.
//!
//! Eligible entries (level requirement met) are walked in table order while
//! accumulating weight; the first entry whose running total exceeds the roll
//! wins. Zero-weight entries therefore can never be drawn.

use rand::Rng;

use crate::config::ForagingTiming;
use crate::data::ItemDefinition;

/// Sum of weights of the entries a forager at `skill_level` can find.
pub fn eligible_weight(table: &[ItemDefinition], skill_level: i32) -> u64 {
    table
        .iter()
        .filter(|item| item.is_eligible(skill_level))
        .map(|item| u64::from(item.weight))
        .sum()
}

/// Pick the entry for a roll in `[0, eligible_weight)`. Rolls outside that
/// range select nothing.
pub fn select_weighted(
    table: &[ItemDefinition],
    skill_level: i32,
    roll: u64,
) -> Option<&ItemDefinition> {
    let mut cumulative = 0u64;
    for item in table.iter().filter(|item| item.is_eligible(skill_level)) {
        cumulative += u64::from(item.weight);
        if cumulative > roll {
            return Some(item);
        }
    }
    None
}

/// Draw one item from `table` for a forager at `skill_level`.
///
/// Returns `None` when nothing is eligible (or every eligible entry has zero
/// weight). Consumes exactly one value from `rng` otherwise.
pub fn resolve<'a, R: Rng + ?Sized>(
    table: &'a [ItemDefinition],
    skill_level: i32,
    rng: &mut R,
) -> Option<&'a ItemDefinition> {
    let total = eligible_weight(table, skill_level);
    if total == 0 {
        return None;
    }
    let roll = rng.gen_range(0..total);
    select_weighted(table, skill_level, roll)
}

/// Time a forage takes in a scene of `difficulty` for a forager at `level`.
pub fn forage_duration_ms(difficulty: i32, level: i32, timing: &ForagingTiming) -> u64 {
    let adjusted = timing.base_ms as i64 + i64::from(difficulty - level) * timing.per_level_ms;
    adjusted.max(timing.min_ms as i64) as u64
}
