//! Item factories: the pluggable strategy that realizes visible items.
//!
//! A wrap-list never draws anything itself. For every visible index it asks
//! its [`ItemFactory`] to create (once per slot) and update (whenever the
//! index or its data changes) an item, then places that item.

mod thumbnail;

pub use thumbnail::{
    shrink_to_width, Thumbnail, ThumbnailCollection, ThumbnailItem, ThumbnailItemFactory,
    ThumbnailMetrics, ELLIPSIS,
};

use crate::geometry::Size;
use crate::model::SequenceModel;
use crate::view::{LayoutMode, ViewId};

/// Per-index state the engine passes to [`ItemFactory::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemState {
    pub selected: bool,
    pub focused: bool,
}

/// The view an item is being created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentContext {
    pub view: ViewId,
    pub mode: LayoutMode,
    pub item_size: Size,
}

/// Creates and refreshes the items of one wrap-list.
///
/// The engine calls these from inside a reconcile pass with its internal
/// state locked; implementations must not call back into the wrap-list.
pub trait ItemFactory: Send + Sync + 'static {
    /// The sequence this factory knows how to render.
    type Model: SequenceModel + ?Sized + 'static;
    /// One realized item.
    type Item: Send + 'static;

    /// Build a blank item owned by the view in `parent`.
    fn create(&self, parent: &ParentContext) -> Self::Item;

    /// Refresh `item` to show `index` of `model`.
    ///
    /// `index` may be out of range if the model shrank since the pass
    /// started; implementations should blank the item then.
    fn update(&self, item: &mut Self::Item, model: &Self::Model, index: usize, state: ItemState);

    /// Size every item occupies. Must not change while the factory is
    /// installed.
    fn item_size(&self) -> Size;

    /// Dispose of an item whose slot was destroyed.
    fn release(&self, item: Self::Item) {
        drop(item);
    }
}
