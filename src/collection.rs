//! Per-scene record of which forageable items the player has found.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionLog {
    discovered: BTreeMap<String, BTreeSet<String>>,
}

impl CollectionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a find. Returns true the first time `item_id` turns up in `scene_id`.
    pub fn record(&mut self, scene_id: &str, item_id: &str) -> bool {
        self.discovered
            .entry(scene_id.to_string())
            .or_default()
            .insert(item_id.to_string())
    }

    pub fn discovered(&self, scene_id: &str) -> impl Iterator<Item = &String> {
        self.discovered.get(scene_id).into_iter().flatten()
    }

    pub fn has_discovered(&self, scene_id: &str, item_id: &str) -> bool {
        self.discovered
            .get(scene_id)
            .is_some_and(|items| items.contains(item_id))
    }

    /// (found, total) for a scene whose loot table has `total` entries
    pub fn progress(&self, scene_id: &str, total: usize) -> (usize, usize) {
        let found = self.discovered.get(scene_id).map_or(0, BTreeSet::len);
        (found.min(total), total)
    }

    pub fn total_discovered(&self) -> usize {
        self.discovered.values().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_first_discovery_only() {
        let mut log = CollectionLog::new();
        assert!(log.record("forest", "apple"));
        assert!(!log.record("forest", "apple"));
        assert!(log.record("forest clearing", "apple"));
        assert!(log.record("forest", "herbs"));

        assert!(log.has_discovered("forest", "herbs"));
        assert!(!log.has_discovered("bank", "herbs"));
        assert_eq!(log.total_discovered(), 3);
    }

    #[test]
    fn test_discovered_is_sorted() {
        let mut log = CollectionLog::new();
        log.record("forest", "pebbles");
        log.record("forest", "apple");

        let found: Vec<_> = log.discovered("forest").cloned().collect();
        assert_eq!(found, vec!["apple".to_string(), "pebbles".to_string()]);
        assert_eq!(log.discovered("farm").count(), 0);
    }

    #[test]
    fn test_progress() {
        let mut log = CollectionLog::new();
        assert_eq!(log.progress("forest", 8), (0, 8));
        log.record("forest", "apple");
        log.record("forest", "herbs");
        assert_eq!(log.progress("forest", 8), (2, 8));
    }
}
