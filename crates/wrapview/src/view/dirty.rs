//! Coalescing of pending work between reconcile passes.

use crate::model::Span;

/// The union of every index range invalidated since the last pass.
///
/// Marks merge into one covering span: `start` is the smallest start seen and
/// the end is the largest end, or unbounded if any mark was unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyRange {
    span: Option<Span>,
}

impl DirtyRange {
    pub const fn new() -> Self {
        Self { span: None }
    }

    pub fn is_clean(&self) -> bool {
        self.span.is_none()
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Merge `span` into the pending range. Empty spans are ignored.
    pub fn mark(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        self.span = Some(match self.span {
            None => span,
            Some(current) => {
                let start = current.start.min(span.start);
                match current.end().zip(span.end()) {
                    Some((a, b)) => Span::new(start, a.max(b) - start),
                    None => Span::to_end(start),
                }
            }
        });
    }

    /// Whether `index` falls inside the pending range.
    pub fn contains(&self, index: usize) -> bool {
        self.span.is_some_and(|span| span.contains(index))
    }

    /// Take the pending range, leaving this one clean.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Non-range work requested since the last pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    /// Requested scroll offsets differ from the committed ones.
    pub scroll: bool,
    /// Mode, spacing, viewport or item metrics changed.
    pub geometry: bool,
    /// The item factory was replaced; every slot must be rebuilt.
    pub factory: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.scroll || self.geometry || self.factory
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
