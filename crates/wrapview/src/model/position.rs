//! Per-index placement for manual layout mode.

use parking_lot::RwLock;

use super::sequence::{SequenceModel, SequenceSignals, Span};
use crate::geometry::Point;

/// A sequence model that also places each index at a fixed content
/// coordinate.
///
/// Only consulted in [`LayoutMode::Manual`](crate::view::LayoutMode::Manual).
/// The model's length bounds how many items manual mode can show.
pub trait PositionModel: SequenceModel {
    /// Top-left corner of the item at `index`, in content coordinates.
    fn position(&self, index: usize) -> Option<Point>;
}

/// Vector-backed [`PositionModel`].
#[derive(Default)]
pub struct PositionList {
    points: RwLock<Vec<Point>>,
    signals: SequenceSignals,
}

impl PositionList {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: RwLock::new(points),
            signals: SequenceSignals::new(),
        }
    }

    pub fn push(&self, point: Point) {
        let index = {
            let mut points = self.points.write();
            points.push(point);
            points.len() - 1
        };
        self.signals.emit_added(Span::new(index, 1));
    }

    /// Move the item at `index`. Returns `false` if out of range.
    pub fn set_position(&self, index: usize, point: Point) -> bool {
        let moved = {
            let mut points = self.points.write();
            match points.get_mut(index) {
                Some(slot) if *slot != point => {
                    *slot = point;
                    true
                }
                _ => false,
            }
        };
        if moved {
            self.signals.emit_changed(Span::new(index, 1));
        }
        moved
    }

    pub fn remove(&self, index: usize) -> Option<Point> {
        let removed = {
            let mut points = self.points.write();
            (index < points.len()).then(|| points.remove(index))
        };
        if removed.is_some() {
            self.signals.emit_removed(Span::new(index, 1));
        }
        removed
    }

    /// Replace every position.
    pub fn set_points(&self, points: Vec<Point>) {
        *self.points.write() = points;
        self.signals.emit_changed(Span::everything());
    }
}

impl SequenceModel for PositionList {
    fn len(&self) -> usize {
        self.points.read().len()
    }

    fn signals(&self) -> &SequenceSignals {
        &self.signals
    }
}

impl PositionModel for PositionList {
    fn position(&self, index: usize) -> Option<Point> {
        self.points.read().get(index).copied()
    }
}
