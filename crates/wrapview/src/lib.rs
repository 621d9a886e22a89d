//! Wrapview - a virtualized wrap-list engine.
//!
//! Displays a large sequence of uniformly sized items in a scrollable grid
//! that wraps into rows (row-major) or columns (column-major), or places them
//! at explicit coordinates (manual). Only the items that intersect the
//! viewport are realized; they are created through a pluggable
//! [`ItemFactory`](factory::ItemFactory) and recycled as the view scrolls.
//!
//! Data changes arrive through observable models ([`model`]); the engine
//! coalesces them into one deferred pass per idle tick on a caller-supplied
//! [`IdleScheduler`](wrapview_core::IdleScheduler).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wrapview::prelude::*;
//!
//! let queue = Arc::new(IdleQueue::new());
//! let config = WrapListConfig::default();
//!
//! let photos = Arc::new(ThumbnailCollection::new(
//!     (0..1000).map(|i| Thumbnail::new(format!("IMG_{i:04}.jpg"))).collect(),
//! ));
//! let selection = Arc::new(IntervalSelection::new());
//!
//! let view = WrapList::with_config(queue.clone(), &config);
//! view.set_factory(Some(Arc::new(ThumbnailItemFactory::from_config(&config.item)?)));
//! view.set_model(Some(photos.clone()));
//! view.set_selection_model(Some(selection.clone()));
//! view.set_viewport_size(Size::new(1024, 768));
//!
//! // Host event loop, once per tick:
//! queue.run_pending();
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod model;
pub mod prelude;
pub mod view;

pub use config::{ItemConfig, WrapListConfig};
pub use error::{WrapViewError, WrapViewResult};
pub use view::WrapList;
pub use wrapview_core;
