//! The wrap-list view: layout math, pending-work bookkeeping, slot
//! recycling, pointer and keyboard selection and the engine that ties them
//! together.

mod dirty;
mod interaction;
mod layout;
mod slots;
mod wrap_list;

pub use interaction::{Click, ClickOutcome, Modifiers, MouseButton, Navigate};
pub use layout::{
    snap_to_block, LayoutDescriptor, LayoutMode, ManualLayout, ScrollOffsets, Spacing,
};
pub use wrap_list::{ReconcileStats, UpdatePhase, ViewId, WrapList, WrapListSignals};
