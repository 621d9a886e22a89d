//! Observable models consumed by the wrap-list engine.
//!
//! - [`SequenceModel`]: the backing data, observed through
//!   [`SequenceSignals`]
//! - [`SelectionModel`]: which indices are selected, itself a sequence model
//! - [`PositionModel`]: per-index coordinates for manual layout
//!
//! Concrete implementations: [`ListModel`], [`IntervalSelection`],
//! [`PositionList`].

mod interval;
mod list;
mod position;
mod selection;
mod sequence;

pub use interval::{Interval, IntervalSet};
pub use list::ListModel;
pub use position::{PositionList, PositionModel};
pub use selection::{IntervalSelection, SelectionModel};
pub use sequence::{
    subscribe, Extent, SequenceListener, SequenceModel, SequenceSignals, Span, Subscription,
};
