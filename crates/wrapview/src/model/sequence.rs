//! The observable sequence contract.
//!
//! A [`SequenceModel`] is a read-only view of `len()` items plus three
//! notification channels ([`SequenceSignals`]). Producers emit after their
//! state has changed, so `len()` is already current when a slot runs.
//!
//! `added` and `removed` shift every index at or after `start`. A span whose
//! extent is [`Extent::All`] means "from `start` to the end", used when the
//! producer cannot tell how far the change reaches.

use std::ops::Range;
use std::sync::{Arc, Weak};

use wrapview_core::{ConnectionId, Signal};

use wrapview_core::logging::targets::MODEL;

/// How far a notification reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    /// Exactly this many indices.
    Count(usize),
    /// Everything from the start index to the end of the sequence.
    All,
}

/// An index range carried by a sequence notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub extent: Extent,
}

impl Span {
    /// `count` indices starting at `start`.
    pub const fn new(start: usize, count: usize) -> Self {
        Self {
            start,
            extent: Extent::Count(count),
        }
    }

    /// Every index from `start` onward.
    pub const fn to_end(start: usize) -> Self {
        Self {
            start,
            extent: Extent::All,
        }
    }

    /// The whole sequence.
    pub const fn everything() -> Self {
        Self::to_end(0)
    }

    /// Exclusive end, or `None` when unbounded.
    pub fn end(&self) -> Option<usize> {
        match self.extent {
            Extent::Count(count) => Some(self.start.saturating_add(count)),
            Extent::All => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.extent, Extent::Count(0))
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && self.end().is_none_or(|end| index < end)
    }

    /// The part of this span that falls inside `window`.
    pub fn clip(&self, window: Range<usize>) -> Range<usize> {
        let start = self.start.max(window.start);
        let end = self.end().map_or(window.end, |end| end.min(window.end));
        start..end.max(start)
    }
}

/// Notification channels every sequence model exposes.
///
/// Args for all three: the affected [`Span`].
pub struct SequenceSignals {
    /// Items in the span changed in place.
    pub changed: Signal<Span>,
    /// Items were inserted at `start`.
    pub added: Signal<Span>,
    /// Items were removed from `start`.
    pub removed: Signal<Span>,
}

impl Default for SequenceSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceSignals {
    /// Creates a new set of sequence signals.
    pub fn new() -> Self {
        Self {
            changed: Signal::new(),
            added: Signal::new(),
            removed: Signal::new(),
        }
    }

    pub fn emit_changed(&self, span: Span) {
        tracing::trace!(target: MODEL, ?span, "changed");
        self.changed.emit(span);
    }

    pub fn emit_added(&self, span: Span) {
        tracing::trace!(target: MODEL, ?span, "added");
        self.added.emit(span);
    }

    pub fn emit_removed(&self, span: Span) {
        tracing::trace!(target: MODEL, ?span, "removed");
        self.removed.emit(span);
    }
}

/// A read-only, observable sequence of items.
pub trait SequenceModel: Send + Sync {
    /// Number of items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The notification channels for this model.
    fn signals(&self) -> &SequenceSignals;
}

/// Receives every notification kind of one sequence model.
///
/// Register with [`subscribe`]; the returned [`Subscription`] unsubscribes
/// on drop.
pub trait SequenceListener: Send + Sync {
    fn changed(&self, span: Span);
    fn added(&self, span: Span);
    fn removed(&self, span: Span);
}

/// A live registration of a [`SequenceListener`] on a model.
///
/// Holds the model weakly, so a subscription never keeps a model alive.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribe now instead of at drop.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Connect `listener` to all three notification kinds of `model`.
pub fn subscribe<M>(model: &Arc<M>, listener: Arc<dyn SequenceListener>) -> Subscription
where
    M: SequenceModel + ?Sized + 'static,
{
    let signals = model.signals();

    let on_changed = listener.clone();
    let changed = signals.changed.connect(move |span| on_changed.changed(*span));
    let on_added = listener.clone();
    let added = signals.added.connect(move |span| on_added.added(*span));
    let removed = signals.removed.connect(move |span| listener.removed(*span));

    let weak: Weak<M> = Arc::downgrade(model);
    Subscription {
        detach: Some(Box::new(move || {
            if let Some(model) = weak.upgrade() {
                detach_all(model.signals(), [changed, added, removed]);
            }
        })),
    }
}

fn detach_all(signals: &SequenceSignals, [changed, added, removed]: [ConnectionId; 3]) {
    let results = [
        signals.changed.try_disconnect(changed),
        signals.added.try_disconnect(added),
        signals.removed.try_disconnect(removed),
    ];
    for result in results {
        if let Err(err) = result {
            tracing::warn!(target: MODEL, %err, "listener was already detached");
        }
    }
}
