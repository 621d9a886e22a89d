//! Vector-backed sequence model.
//!
//! `ListModel<T>` is the simplest producer for a wrap-list: a `Vec<T>` whose
//! mutators emit the matching [`SequenceSignals`] after the change is applied.

use parking_lot::RwLock;

use super::sequence::{SequenceModel, SequenceSignals, Span};

/// A list of items that notifies observers of every change.
///
/// # Example
///
/// ```ignore
/// use wrapview::model::{ListModel, SequenceModel};
///
/// let photos = ListModel::new(vec!["a.png".to_string(), "b.png".to_string()]);
/// photos.signals().added.connect(|span| println!("inserted at {}", span.start));
/// photos.push("c.png".to_string());
/// assert_eq!(photos.len(), 3);
/// ```
pub struct ListModel<T> {
    items: RwLock<Vec<T>>,
    signals: SequenceSignals,
}

impl<T> Default for ListModel<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            signals: SequenceSignals::new(),
        }
    }
}

impl<T: Send + Sync> ListModel<T> {
    /// Creates a list model holding `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            signals: SequenceSignals::new(),
        }
    }

    /// Appends an item to the end of the list.
    pub fn push(&self, item: T) {
        let index = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        self.signals.emit_added(Span::new(index, 1));
    }

    /// Appends several items with a single notification.
    pub fn extend(&self, new_items: impl IntoIterator<Item = T>) {
        let (start, count) = {
            let mut items = self.items.write();
            let start = items.len();
            items.extend(new_items);
            (start, items.len() - start)
        };
        if count > 0 {
            self.signals.emit_added(Span::new(start, count));
        }
    }

    /// Inserts an item at `index`, clamped to the current length.
    pub fn insert(&self, index: usize, item: T) {
        let index = {
            let mut items = self.items.write();
            let index = index.min(items.len());
            items.insert(index, item);
            index
        };
        self.signals.emit_added(Span::new(index, 1));
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.write();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.signals.emit_removed(Span::new(index, 1));
        }
        removed
    }

    /// Removes up to `count` items starting at `start`.
    ///
    /// Returns the number of items actually removed.
    pub fn remove_range(&self, start: usize, count: usize) -> usize {
        let removed = {
            let mut items = self.items.write();
            if start >= items.len() {
                0
            } else {
                let end = start.saturating_add(count).min(items.len());
                items.drain(start..end).count()
            }
        };
        if removed > 0 {
            self.signals.emit_removed(Span::new(start, removed));
        }
        removed
    }

    /// Replaces the item at `index`. Returns `false` if out of range.
    pub fn set(&self, index: usize, item: T) -> bool {
        let replaced = {
            let mut items = self.items.write();
            match items.get_mut(index) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.signals.emit_changed(Span::new(index, 1));
        }
        replaced
    }

    /// Provides mutable access to an item via a closure.
    ///
    /// Emits `changed` after modification.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut items = self.items.write();
            items.get_mut(index).map(f)
        };
        if result.is_some() {
            self.signals.emit_changed(Span::new(index, 1));
        }
        result
    }

    /// Removes all items from the model.
    pub fn clear(&self) {
        let removed = {
            let mut items = self.items.write();
            let len = items.len();
            items.clear();
            len
        };
        if removed > 0 {
            self.signals.emit_removed(Span::new(0, removed));
        }
    }

    /// Replaces all items.
    ///
    /// Observers receive `changed(0, ALL)` because the old and new contents
    /// are unrelated.
    pub fn set_items(&self, items: Vec<T>) {
        *self.items.write() = items;
        self.signals.emit_changed(Span::everything());
    }

    /// Runs `f` on the item at `index`.
    pub fn with_item<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&T) -> R,
    {
        self.items.read().get(index).map(f)
    }

    /// Returns a reference to the items (read-only access).
    pub fn items(&self) -> impl std::ops::Deref<Target = Vec<T>> + '_ {
        self.items.read()
    }
}

impl<T: Clone + Send + Sync> ListModel<T> {
    /// Returns a clone of the item at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }
}

impl<T: Send + Sync> SequenceModel for ListModel<T> {
    fn len(&self) -> usize {
        self.items.read().len()
    }

    fn signals(&self) -> &SequenceSignals {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn record(model: &ListModel<u32>) -> Arc<Mutex<Vec<(&'static str, Span)>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let signals = model.signals();
        let e = events.clone();
        signals.changed.connect(move |span| e.lock().push(("changed", *span)));
        let e = events.clone();
        signals.added.connect(move |span| e.lock().push(("added", *span)));
        let e = events.clone();
        signals.removed.connect(move |span| e.lock().push(("removed", *span)));
        events
    }

    #[test]
    fn test_push_and_signals() {
        let model = ListModel::new(vec![1u32, 2]);
        let events = record(&model);

        model.push(3);
        model.extend([4, 5]);
        model.extend(Vec::new());

        assert_eq!(model.len(), 5);
        assert_eq!(
            *events.lock(),
            vec![("added", Span::new(2, 1)), ("added", Span::new(3, 2))]
        );
    }

    #[test]
    fn test_remove_and_signals() {
        let model = ListModel::new((0..10u32).collect());
        let events = record(&model);

        assert_eq!(model.remove(0), Some(0));
        assert_eq!(model.remove(99), None);
        assert_eq!(model.remove_range(5, 100), 4);
        assert_eq!(model.remove_range(50, 1), 0);

        assert_eq!(*model.items(), vec![1, 2, 3, 4, 5]);
        assert_eq!(
            *events.lock(),
            vec![
                ("removed", Span::new(0, 1)),
                ("removed", Span::new(5, 4)),
            ]
        );
    }

    #[test]
    fn test_length_is_current_when_notified() {
        let model = Arc::new(ListModel::new(vec![0u32; 4]));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&model);
        let seen_clone = seen.clone();
        model.signals().removed.connect(move |_| {
            if let Some(model) = weak.upgrade() {
                seen_clone.lock().push(model.len());
            }
        });

        model.remove_range(1, 2);
        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn test_set_and_modify() {
        let model = ListModel::new(vec![1u32, 2, 3]);
        let events = record(&model);

        assert!(model.set(1, 20));
        assert!(!model.set(5, 0));
        assert_eq!(
            model.modify(2, |v| {
                *v *= 10;
                *v
            }),
            Some(30)
        );
        assert_eq!(model.modify(9, |v| *v), None);

        assert_eq!(model.get(1), Some(20));
        assert_eq!(model.with_item(2, |v| *v + 1), Some(31));
        assert_eq!(events.lock().len(), 2);
    }

    #[test]
    fn test_insert_clamps() {
        let model = ListModel::new(vec![1u32]);
        let events = record(&model);

        model.insert(10, 2);
        model.insert(0, 0);

        assert_eq!(*model.items(), vec![0, 1, 2]);
        assert_eq!(
            *events.lock(),
            vec![("added", Span::new(1, 1)), ("added", Span::new(0, 1))]
        );
    }

    #[test]
    fn test_clear_and_set_items() {
        let model = ListModel::new(vec![1u32, 2, 3]);
        let events = record(&model);

        model.clear();
        model.clear();
        model.set_items(vec![7, 8]);

        assert_eq!(model.len(), 2);
        assert_eq!(
            *events.lock(),
            vec![
                ("removed", Span::new(0, 3)),
                ("changed", Span::everything()),
            ]
        );
    }
}
