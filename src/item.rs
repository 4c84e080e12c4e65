use serde::Serialize;
use tracing::debug;

// ============================================================================
// Item Stacks
// ============================================================================

/// A count of one catalogue item, owned by exactly one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStack {
    pub item_id: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item_id: &str, count: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            count,
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

pub const INVENTORY_SIZE: usize = 24;

/// Slot contents as shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySlotView {
    pub slot: usize,
    pub item_id: String,
    pub count: u32,
}

/// Fixed number of slots; one slot per distinct item, stacks are unbounded.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_capacity(INVENTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.item_id == item_id))
    }

    /// Whether `item_id` could be added right now.
    pub fn can_accept(&self, item_id: &str) -> bool {
        self.position(item_id).is_some() || !self.is_full()
    }

    /// Whether `count` more of a held item would overflow its stack.
    pub fn would_overflow(&self, item_id: &str, count: u32) -> bool {
        self.count_of(item_id).checked_add(count).is_none()
    }

    /// Add `count` of an item. Merges into an existing stack, otherwise takes
    /// the first empty slot. Returns false, changing nothing, when the item is
    /// new and no slot is free, or when the stack would overflow. A zero count
    /// is rejected the same way.
    pub fn add(&mut self, item_id: &str, count: u32) -> bool {
        if count == 0 {
            return false;
        }

        if let Some(index) = self.position(item_id) {
            if let Some(stack) = self.slots[index].as_mut() {
                return match stack.count.checked_add(count) {
                    Some(total) => {
                        stack.count = total;
                        true
                    }
                    None => {
                        debug!("Stack of {} is full, cannot add {}", item_id, count);
                        false
                    }
                };
            }
        }

        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(ItemStack::new(item_id, count));
                true
            }
            None => {
                debug!("Inventory full, cannot add {} x{}", item_id, count);
                false
            }
        }
    }

    /// Remove up to `count` of an item, freeing its slot when the stack runs
    /// out. Absent items are ignored. Returns how many were removed.
    pub fn remove(&mut self, item_id: &str, count: u32) -> u32 {
        let Some(index) = self.position(item_id) else {
            return 0;
        };
        let held = self.slots[index].as_ref().map_or(0, |s| s.count);
        if held > count {
            if let Some(stack) = self.slots[index].as_mut() {
                stack.count -= count;
            }
            count
        } else {
            self.slots[index] = None;
            held
        }
    }

    pub fn count_of(&self, item_id: &str) -> u32 {
        self.position(item_id)
            .and_then(|i| self.slots[i].as_ref())
            .map_or(0, |s| s.count)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.position(item_id).is_some()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn free_slots(&self) -> usize {
        self.capacity() - self.occupied_slots()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_slots() == self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_slots() == 0
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Empty every slot, handing back the stacks in slot order.
    pub fn take_all(&mut self) -> Vec<ItemStack> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    /// Stacks in slot order
    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    /// Occupied slots with their indices, for display
    pub fn slots(&self) -> Vec<InventorySlotView> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|s| InventorySlotView {
                    slot: i,
                    item_id: s.item_id.clone(),
                    count: s.count,
                })
            })
            .collect()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
