//! Commonly used types:
//!
//! ```ignore
//! use wrapview::prelude::*;
//! ```

pub use crate::config::{ItemConfig, WrapListConfig};
pub use crate::error::{WrapViewError, WrapViewResult};
pub use crate::factory::{
    ItemFactory, ItemState, ParentContext, Thumbnail, ThumbnailCollection, ThumbnailItem,
    ThumbnailItemFactory,
};
pub use crate::geometry::{Point, Rect, Size};
pub use crate::model::{
    IntervalSelection, ListModel, PositionList, PositionModel, SelectionModel, SequenceModel, Span,
};
pub use crate::view::{
    Click, ClickOutcome, LayoutMode, Navigate, ReconcileStats, ScrollOffsets, Spacing,
    UpdatePhase, WrapList,
};
pub use wrapview_core::{IdleQueue, IdleScheduler, Signal};
