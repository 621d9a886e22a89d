//! Selection models for wrap-list views.
//!
//! A [`SelectionModel`] is itself a [`SequenceModel`]: its `len()` is the
//! number of selected indices and its notifications describe which indices
//! changed selection state. Unlike a data sequence, `added`/`removed` here do
//! not shift anything; they mean "became selected" and "became unselected".
//!
//! [`IntervalSelection`] stores the selection as an [`IntervalSet`].
//!
//! # Example
//!
//! ```ignore
//! use wrapview::model::{IntervalSelection, SelectionModel};
//!
//! let selection = IntervalSelection::new();
//! selection.set_interval(0, 10);
//! selection.remove_interval(3, 4);
//!
//! assert!(selection.is_selected(2));
//! assert!(!selection.is_selected(5));
//! assert_eq!(selection.len(), 6);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use wrapview_core::Signal;
use wrapview_core::logging::targets;

use super::interval::{Interval, IntervalSet};
use super::sequence::{SequenceModel, SequenceSignals, Span};

/// The contract the wrap-list engine needs from a selection.
///
/// Mutators take `&self`; implementations use interior mutability and emit
/// after releasing their own locks.
pub trait SelectionModel: SequenceModel {
    fn is_selected(&self, index: usize) -> bool;

    /// First selected index, `None` when nothing is selected.
    fn min_selected(&self) -> Option<usize>;

    /// Last selected index, `None` when nothing is selected.
    fn max_selected(&self) -> Option<usize>;

    /// Deselect everything.
    fn clear(&self);

    /// Make `[start, start + len)` the whole selection.
    fn set_interval(&self, start: usize, len: usize);

    /// Add `[start, start + len)` to the selection.
    fn add_interval(&self, start: usize, len: usize);

    /// Remove `[start, start + len)` from the selection.
    fn remove_interval(&self, start: usize, len: usize);

    /// Whether a producer is in the middle of a multi-step change.
    fn is_adjusting(&self) -> bool {
        false
    }

    /// Select `index` if unselected, deselect it otherwise.
    fn toggle(&self, index: usize) {
        if self.is_selected(index) {
            self.remove_interval(index, 1);
        } else {
            self.add_interval(index, 1);
        }
    }
}

/// Interval-backed selection.
pub struct IntervalSelection {
    set: RwLock<IntervalSet>,
    adjusting: AtomicBool,
    signals: SequenceSignals,
    /// Emitted when the adjusting flag flips. Args: new value.
    pub adjusting_changed: Signal<bool>,
}

impl Default for IntervalSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalSelection {
    /// An empty selection.
    pub fn new() -> Self {
        Self {
            set: RwLock::new(IntervalSet::new()),
            adjusting: AtomicBool::new(false),
            signals: SequenceSignals::new(),
            adjusting_changed: Signal::new(),
        }
    }

    /// Snapshot of the stored intervals.
    pub fn intervals(&self) -> Vec<Interval> {
        self.set.read().as_slice().to_vec()
    }

    /// Select `[0, len)`.
    pub fn select_all(&self, len: usize) {
        self.set_interval(0, len);
    }

    /// Mark the start or end of a multi-step change.
    pub fn set_adjusting(&self, adjusting: bool) {
        if self.adjusting.swap(adjusting, Ordering::SeqCst) != adjusting {
            self.adjusting_changed.emit(adjusting);
        }
    }
}

impl SequenceModel for IntervalSelection {
    /// Number of selected indices.
    fn len(&self) -> usize {
        self.set.read().count()
    }

    fn is_empty(&self) -> bool {
        self.set.read().is_empty()
    }

    fn signals(&self) -> &SequenceSignals {
        &self.signals
    }
}

impl SelectionModel for IntervalSelection {
    fn is_selected(&self, index: usize) -> bool {
        self.set.read().contains(index)
    }

    fn min_selected(&self) -> Option<usize> {
        self.set.read().min()
    }

    fn max_selected(&self) -> Option<usize> {
        self.set.read().max()
    }

    fn clear(&self) {
        let cleared = {
            let mut set = self.set.write();
            let bounds = set.min().zip(set.max());
            set.clear();
            bounds
        };
        if let Some((min, max)) = cleared {
            tracing::trace!(target: targets::MODEL, min, max, "selection cleared");
            self.signals.emit_removed(Span::new(min, max - min + 1));
        }
    }

    fn set_interval(&self, start: usize, len: usize) {
        self.clear();
        self.add_interval(start, len);
    }

    /// Notifies with the requested range even when it merged with neighbours.
    fn add_interval(&self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.set.write().insert(start, len);
        self.signals.emit_added(Span::new(start, len));
    }

    fn remove_interval(&self, start: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = start.saturating_add(len);
        let whole = {
            let set = self.set.read();
            match set.min().zip(set.max()) {
                None => return,
                Some((min, max)) if end <= min || start > max => return,
                Some((min, max)) => start <= min && end > max,
            }
        };

        if whole {
            self.clear();
            return;
        }

        let removed = self.set.write().remove(start, len);
        if removed {
            self.signals.emit_removed(Span::new(start, len));
        }
    }

    fn is_adjusting(&self) -> bool {
        self.adjusting.load(Ordering::SeqCst)
    }
}

static_assertions::assert_impl_all!(IntervalSelection: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Added(Span),
        Removed(Span),
    }

    fn record(selection: &IntervalSelection) -> Arc<Mutex<Vec<Event>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let added = events.clone();
        selection
            .signals()
            .added
            .connect(move |span| added.lock().push(Event::Added(*span)));
        let removed = events.clone();
        selection
            .signals()
            .removed
            .connect(move |span| removed.lock().push(Event::Removed(*span)));
        events
    }

    fn bounds(selection: &IntervalSelection) -> Vec<(usize, usize)> {
        selection
            .intervals()
            .iter()
            .map(|iv| (iv.start(), iv.end()))
            .collect()
    }

    #[test]
    fn test_empty_selection_bounds() {
        let selection = IntervalSelection::new();
        assert_eq!(selection.min_selected(), None);
        assert_eq!(selection.max_selected(), None);
        assert!(!selection.is_selected(0));
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_add_reports_requested_range() {
        let selection = IntervalSelection::new();
        let events = record(&selection);

        selection.add_interval(4, 3);
        selection.add_interval(7, 2);

        assert_eq!(bounds(&selection), vec![(4, 9)]);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Added(Span::new(4, 3)),
                Event::Added(Span::new(7, 2)),
            ]
        );
    }

    #[test]
    fn test_set_then_remove_splits() {
        let selection = IntervalSelection::new();
        selection.set_interval(0, 10);
        let events = record(&selection);

        selection.remove_interval(3, 4);

        assert_eq!(bounds(&selection), vec![(0, 3), (7, 10)]);
        assert_eq!(selection.len(), 6);
        assert_eq!(*events.lock(), vec![Event::Removed(Span::new(3, 4))]);
    }

    #[test]
    fn test_clear_reports_full_extent() {
        let selection = IntervalSelection::new();
        selection.add_interval(2, 2);
        selection.add_interval(10, 1);
        let events = record(&selection);

        selection.clear();
        selection.clear();

        assert_eq!(*events.lock(), vec![Event::Removed(Span::new(2, 9))]);
    }

    #[test]
    fn test_set_interval_clears_first() {
        let selection = IntervalSelection::new();
        selection.add_interval(0, 2);
        let events = record(&selection);

        selection.set_interval(5, 3);

        assert_eq!(bounds(&selection), vec![(5, 8)]);
        assert_eq!(
            *events.lock(),
            vec![
                Event::Removed(Span::new(0, 2)),
                Event::Added(Span::new(5, 3)),
            ]
        );
    }

    #[test]
    fn test_remove_covering_everything_clears() {
        let selection = IntervalSelection::new();
        selection.add_interval(3, 2);
        selection.add_interval(8, 2);
        let events = record(&selection);

        selection.remove_interval(0, 50);

        assert!(selection.is_empty());
        assert_eq!(*events.lock(), vec![Event::Removed(Span::new(3, 7))]);
    }

    #[test]
    fn test_remove_outside_bounds_is_silent() {
        let selection = IntervalSelection::new();
        selection.add_interval(10, 5);
        let events = record(&selection);

        selection.remove_interval(0, 10);
        selection.remove_interval(15, 5);
        selection.remove_interval(12, 0);

        assert!(events.lock().is_empty());
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn test_remove_in_gap_is_silent() {
        let selection = IntervalSelection::new();
        selection.add_interval(0, 2);
        selection.add_interval(10, 2);
        let events = record(&selection);

        selection.remove_interval(4, 3);

        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_toggle() {
        let selection = IntervalSelection::new();
        selection.toggle(3);
        assert!(selection.is_selected(3));
        selection.toggle(3);
        assert!(!selection.is_selected(3));
    }

    #[test]
    fn test_select_all() {
        let selection = IntervalSelection::new();
        selection.select_all(25);
        assert_eq!(selection.len(), 25);
        assert_eq!(selection.min_selected(), Some(0));
        assert_eq!(selection.max_selected(), Some(24));
    }

    #[test]
    fn test_adjusting_flag() {
        let selection = IntervalSelection::new();
        let flips = Arc::new(Mutex::new(Vec::new()));
        let flips_clone = flips.clone();
        selection
            .adjusting_changed
            .connect(move |&value| flips_clone.lock().push(value));

        selection.set_adjusting(true);
        selection.set_adjusting(true);
        assert!(selection.is_adjusting());
        selection.set_adjusting(false);

        assert_eq!(*flips.lock(), vec![true, false]);
    }
}
