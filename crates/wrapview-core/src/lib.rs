//! Foundation systems for wrapview.
//!
//! This crate provides the pieces the wrap-list engine is built on:
//!
//! - **Signal/Slot System**: typed observer channels with connect/disconnect
//! - **Idle Scheduling**: the [`IdleScheduler`] seam and the stock [`IdleQueue`]
//! - **Logging**: `tracing` targets, span names and [`PerfSpan`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use wrapview_core::{IdleQueue, IdleScheduler, Signal};
//!
//! let queue = Arc::new(IdleQueue::new());
//! let changed = Signal::<usize>::new();
//!
//! let scheduler = queue.clone();
//! changed.connect(move |&n| {
//!     // Defer the expensive part until the host loop goes idle.
//!     let _ = scheduler.schedule_idle(Box::new(move || println!("refresh from {n}")));
//! });
//!
//! changed.emit(3);
//! changed.emit(7);
//! assert_eq!(queue.run_pending(), 2);
//! ```

mod error;
pub mod logging;
pub mod signal;
mod task;

pub use error::{SchedulerError, SignalError};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::{IdleQueue, IdleScheduler, IdleTask, TaskId};
