//! Pool of realized item slots.
//!
//! Slots live in a [`SlotMap`]; a separate map binds data indices to slots.
//! Slots scrolled out of the window are unbound and parked on a free list so
//! the next newly exposed index can reuse them instead of creating an item.

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};

use crate::geometry::Point;

new_key_type! {
    /// Stable handle of one realized slot.
    pub(crate) struct SlotKey;
}

#[derive(Debug)]
pub(crate) struct Slot<I> {
    pub item: I,
    /// Item origin in content coordinates.
    pub origin: Point,
}

/// How [`SlotTable::acquire`] produced a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Acquired {
    /// The index was already bound.
    Bound,
    /// A parked slot was rebound.
    Recycled,
    /// A fresh item was created.
    Created,
}

pub(crate) struct SlotTable<I> {
    slots: SlotMap<SlotKey, Slot<I>>,
    bound: BTreeMap<usize, SlotKey>,
    free: Vec<SlotKey>,
}

impl<I> Default for SlotTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> SlotTable<I> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            bound: BTreeMap::new(),
            free: Vec::new(),
        }
    }

    /// Live slots, bound or parked.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn bound_count(&self) -> usize {
        self.bound.len()
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.bound.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Slot<I>> {
        self.bound.get(&index).and_then(|&key| self.slots.get(key))
    }

    /// Bound slots in ascending index order.
    pub fn iter_bound(&self) -> impl Iterator<Item = (usize, &Slot<I>)> + '_ {
        self.bound
            .iter()
            .filter_map(|(&index, &key)| self.slots.get(key).map(|slot| (index, slot)))
    }

    /// The slot for `index`, binding a parked slot or creating one if needed.
    pub fn acquire(
        &mut self,
        index: usize,
        create: impl FnOnce() -> I,
    ) -> (&mut Slot<I>, Acquired) {
        let (key, how) = if let Some(&key) = self.bound.get(&index) {
            (key, Acquired::Bound)
        } else if let Some(key) = self.free.pop() {
            self.bound.insert(index, key);
            (key, Acquired::Recycled)
        } else {
            let key = self.slots.insert(Slot {
                item: create(),
                origin: Point::ZERO,
            });
            self.bound.insert(index, key);
            (key, Acquired::Created)
        };
        (&mut self.slots[key], how)
    }

    /// Park every bound slot whose index fails `keep`. Returns how many.
    pub fn unbind_where(&mut self, mut keep: impl FnMut(usize) -> bool) -> usize {
        let parked: Vec<usize> = self
            .bound
            .keys()
            .copied()
            .filter(|&index| !keep(index))
            .collect();
        for index in &parked {
            if let Some(key) = self.bound.remove(index) {
                self.free.push(key);
            }
        }
        parked.len()
    }

    /// Destroy every slot bound at or after `len`, returning their items.
    pub fn destroy_from(&mut self, len: usize) -> Vec<I> {
        let doomed = self.bound.split_off(&len);
        doomed
            .into_values()
            .filter_map(|key| self.slots.remove(key))
            .map(|slot| slot.item)
            .collect()
    }

    /// Destroy parked slots until at most `capacity` slots remain.
    pub fn trim_to(&mut self, capacity: usize) -> Vec<I> {
        let mut items = Vec::new();
        while self.slots.len() > capacity {
            let Some(key) = self.free.pop() else {
                break;
            };
            if let Some(slot) = self.slots.remove(key) {
                items.push(slot.item);
            }
        }
        items
    }

    /// Destroy everything, returning all items.
    pub fn drain(&mut self) -> Vec<I> {
        self.bound.clear();
        self.free.clear();
        self.slots.drain().map(|(_, slot)| slot.item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(indices: impl IntoIterator<Item = usize>) -> SlotTable<String> {
        let mut table = SlotTable::new();
        for index in indices {
            table.acquire(index, || format!("item-{index}"));
        }
        table
    }

    #[test]
    fn test_acquire_reports_how() {
        let mut table = SlotTable::new();
        let (_, how) = table.acquire(3, || 30u32);
        assert_eq!(how, Acquired::Created);
        let (slot, how) = table.acquire(3, || unreachable!());
        assert_eq!(how, Acquired::Bound);
        assert_eq!(slot.item, 30);
    }

    #[test]
    fn test_unbind_then_recycle() {
        let mut table = table_with(0..4);
        assert_eq!(table.unbind_where(|index| index >= 2), 2);
        assert_eq!(table.bound_count(), 2);
        assert_eq!(table.len(), 4);

        let (slot, how) = table.acquire(10, || unreachable!());
        assert_eq!(how, Acquired::Recycled);
        assert!(slot.item.starts_with("item-"));
        assert!(table.is_bound(10));
        assert!(!table.is_bound(0));
    }

    #[test]
    fn test_destroy_from() {
        let mut table = table_with([1, 5, 6, 9]);
        let mut items = table.destroy_from(6);
        items.sort();
        assert_eq!(items, vec!["item-6".to_string(), "item-9".to_string()]);
        assert_eq!(table.len(), 2);
        let bound: Vec<usize> = table.iter_bound().map(|(index, _)| index).collect();
        assert_eq!(bound, vec![1, 5]);
    }

    #[test]
    fn test_trim_only_touches_parked() {
        let mut table = table_with(0..5);
        table.unbind_where(|index| index < 3);
        assert_eq!(table.trim_to(1).len(), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.bound_count(), 3);
    }

    #[test]
    fn test_drain() {
        let mut table = table_with(0..3);
        table.unbind_where(|index| index == 0);
        assert_eq!(table.drain().len(), 3);
        assert_eq!(table.len(), 0);
        assert!(table.get(0).is_none());
    }
}
