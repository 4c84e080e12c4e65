//! Bank storage: same stacking rules as the inventory, no slot limit.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::ValidationError;
use crate::item::{Inventory, ItemStack};

#[derive(Debug, Clone, Default)]
pub struct BankLedger {
    stacks: BTreeMap<String, ItemStack>,
}

impl BankLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_room(&self, item_id: &str, count: u32) -> Result<(), ValidationError> {
        match self.count_of(item_id).checked_add(count) {
            Some(_) => Ok(()),
            None => Err(ValidationError::StackOverflow {
                item_id: item_id.to_string(),
                count,
            }),
        }
    }

    /// Merge a stack into the ledger. Empty stacks are dropped. A stack that
    /// would overflow the held count is refused and the ledger is unchanged.
    pub fn deposit(&mut self, stack: ItemStack) -> Result<(), ValidationError> {
        if stack.count == 0 {
            return Ok(());
        }
        self.check_room(&stack.item_id, stack.count)?;
        match self.stacks.get_mut(&stack.item_id) {
            Some(existing) => existing.count += stack.count,
            None => {
                self.stacks.insert(stack.item_id.clone(), stack);
            }
        }
        Ok(())
    }

    /// Move `count` of one item from the inventory into the ledger.
    pub fn deposit_from(
        &mut self,
        inventory: &mut Inventory,
        item_id: &str,
        count: u32,
    ) -> Result<u32, ValidationError> {
        let held = inventory.count_of(item_id);
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

        self.check_room(item_id, count)?;

        let moved = inventory.remove(item_id, count);
        self.deposit(ItemStack::new(item_id, moved))?;
        debug!("Deposited {} x{}", item_id, moved);
        Ok(moved)
    }

    /// Move everything from the inventory into the ledger, leaving it empty.
    /// Returns the stacks that were moved. If any stack would overflow,
    /// nothing moves.
    pub fn deposit_all(
        &mut self,
        inventory: &mut Inventory,
    ) -> Result<Vec<ItemStack>, ValidationError> {
        for stack in inventory.stacks() {
            self.check_room(&stack.item_id, stack.count)?;
        }

        let moved = inventory.take_all();
        for stack in &moved {
            self.deposit(stack.clone())?;
        }
        info!(
            "Deposited {} stacks ({} items) into the bank",
            moved.len(),
            moved.iter().map(|s| u64::from(s.count)).sum::<u64>()
        );
        Ok(moved)
    }

    /// Move `count` of an item into the inventory. Nothing changes unless the
    /// whole amount fits.
    pub fn withdraw(
        &mut self,
        inventory: &mut Inventory,
        item_id: &str,
        count: u32,
    ) -> Result<u32, ValidationError> {
        let held = self.count_of(item_id);
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
        if inventory.would_overflow(item_id, count) {
            return Err(ValidationError::StackOverflow {
                item_id: item_id.to_string(),
                count,
            });
        }
        if !inventory.add(item_id, count) {
            return Err(ValidationError::InventoryFull {
                item_id: item_id.to_string(),
            });
        }

        self.remove(item_id, count);
        debug!("Withdrew {} x{}", item_id, count);
        Ok(count)
    }

    /// Withdraw the whole stack of an item.
    pub fn withdraw_all(
        &mut self,
        inventory: &mut Inventory,
        item_id: &str,
    ) -> Result<u32, ValidationError> {
        let held = self.count_of(item_id);
        self.withdraw(inventory, item_id, held)
    }

    /// Remove up to `count`, deleting the stack when it runs out.
    pub fn remove(&mut self, item_id: &str, count: u32) -> u32 {
        let Some(stack) = self.stacks.get_mut(item_id) else {
            return 0;
        };
        if stack.count > count {
            stack.count -= count;
            count
        } else {
            self.stacks.remove(item_id).map_or(0, |s| s.count)
        }
    }

    pub fn count_of(&self, item_id: &str) -> u32 {
        self.stacks.get(item_id).map_or(0, |s| s.count)
    }

    /// Stacks sorted by item id
    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.values()
    }

    /// Number of distinct items held
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn total_items(&self) -> u64 {
        self.stacks.values().map(|s| u64::from(s.count)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_deposit_merges() {
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("apple", 3)).unwrap();
        bank.deposit(ItemStack::new("apple", 2)).unwrap();
        bank.deposit(ItemStack::new("mint", 0)).unwrap();
        assert_eq!(bank.count_of("apple"), 5);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_deposit_all_moves_exact_union() {
        let mut inventory = Inventory::new();
        inventory.add("apple", 4);
        inventory.add("berry", 1);
        inventory.add("twigs", 7);

        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("apple", 10)).unwrap();
        bank.deposit(ItemStack::new("acorn", 2)).unwrap();

        let mut expected: HashMap<String, u32> = bank
            .stacks()
            .map(|s| (s.item_id.clone(), s.count))
            .collect();
        for stack in inventory.stacks() {
            *expected.entry(stack.item_id.clone()).or_default() += stack.count;
        }

        let moved = bank.deposit_all(&mut inventory).unwrap();
        assert_eq!(moved.len(), 3);
        assert!(inventory.is_empty());

        let actual: HashMap<String, u32> = bank
            .stacks()
            .map(|s| (s.item_id.clone(), s.count))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(bank.total_items(), 24);
    }

    #[test]
    fn test_deposit_from_validates_amount() {
        let mut inventory = Inventory::new();
        inventory.add("apple", 2);
        let mut bank = BankLedger::new();

        assert!(matches!(
            bank.deposit_from(&mut inventory, "apple", 3),
            Err(ValidationError::InvalidAmount { requested: 3, available: 2, .. })
        ));
        assert!(matches!(
            bank.deposit_from(&mut inventory, "pear", 1),
            Err(ValidationError::ItemNotHeld { .. })
        ));
        assert_eq!(bank.deposit_from(&mut inventory, "apple", 2), Ok(2));
        assert!(!inventory.contains("apple"));
        assert_eq!(bank.count_of("apple"), 2);
    }

    #[test]
    fn test_withdraw_partial_and_full() {
        let mut inventory = Inventory::new();
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("morel", 6)).unwrap();

        assert_eq!(bank.withdraw(&mut inventory, "morel", 4), Ok(4));
        assert_eq!(bank.count_of("morel"), 2);
        assert_eq!(inventory.count_of("morel"), 4);

        assert_eq!(bank.withdraw_all(&mut inventory, "morel"), Ok(2));
        assert!(bank.is_empty());
        assert_eq!(inventory.count_of("morel"), 6);
    }

    #[test]
    fn test_withdraw_rejects_invalid_amount() {
        let mut inventory = Inventory::new();
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("morel", 1)).unwrap();

        assert!(matches!(
            bank.withdraw(&mut inventory, "morel", 0),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            bank.withdraw(&mut inventory, "morel", 2),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert_eq!(bank.count_of("morel"), 1);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_withdraw_into_full_inventory_changes_nothing() {
        let mut inventory = Inventory::with_capacity(1);
        inventory.add("apple", 1);
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("berry", 3)).unwrap();

        assert_eq!(
            bank.withdraw(&mut inventory, "berry", 3),
            Err(ValidationError::InventoryFull { item_id: "berry".to_string() })
        );
        assert_eq!(bank.count_of("berry"), 3);
        assert!(!inventory.contains("berry"));

        // Stacking onto an item already held still works
        bank.deposit(ItemStack::new("apple", 2)).unwrap();
        assert_eq!(bank.withdraw(&mut inventory, "apple", 2), Ok(2));
        assert_eq!(inventory.count_of("apple"), 3);
    }

    #[test]
    fn test_deposit_refuses_overflowing_stack() {
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("acorn", u32::MAX)).unwrap();
        assert_eq!(
            bank.deposit(ItemStack::new("acorn", 1)),
            Err(ValidationError::StackOverflow { item_id: "acorn".to_string(), count: 1 })
        );
        assert_eq!(bank.count_of("acorn"), u32::MAX);

        let mut inventory = Inventory::new();
        inventory.add("acorn", 3);
        inventory.add("mint", 2);

        assert!(matches!(
            bank.deposit_from(&mut inventory, "acorn", 3),
            Err(ValidationError::StackOverflow { .. })
        ));
        assert!(matches!(
            bank.deposit_all(&mut inventory),
            Err(ValidationError::StackOverflow { .. })
        ));

        // Neither side lost anything
        assert_eq!(inventory.count_of("acorn"), 3);
        assert_eq!(inventory.count_of("mint"), 2);
        assert_eq!(bank.count_of("acorn"), u32::MAX);
        assert_eq!(bank.count_of("mint"), 0);
    }

    #[test]
    fn test_withdraw_refuses_overflowing_inventory_stack() {
        let mut inventory = Inventory::new();
        inventory.add("acorn", u32::MAX);
        let mut bank = BankLedger::new();
        bank.deposit(ItemStack::new("acorn", 5)).unwrap();

        assert_eq!(
            bank.withdraw(&mut inventory, "acorn", 5),
            Err(ValidationError::StackOverflow { item_id: "acorn".to_string(), count: 5 })
        );
        assert_eq!(bank.count_of("acorn"), 5);
        assert_eq!(inventory.count_of("acorn"), u32::MAX);
    }
}
