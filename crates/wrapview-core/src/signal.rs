//! Typed observer channels.
//!
//! A [`Signal<Args>`] is one notification kind. Producers own their signals
//! and emit them synchronously after their state has changed; observers
//! subscribe with [`Signal::connect`] and unsubscribe with
//! [`Signal::disconnect`] (or by dropping a [`ConnectionGuard`]).
//!
//! Slots run synchronously on the emitting thread. The connection
//! table is not locked while slots run, so a slot may connect or disconnect
//! other slots (the change takes effect from the next emission).
//!
//! # Example
//!
//! ```
//! use wrapview_core::Signal;
//!
//! let length_changed = Signal::<usize>::new();
//!
//! let id = length_changed.connect(|len| {
//!     println!("length is now {len}");
//! });
//!
//! length_changed.emit(42);
//! length_changed.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Identifies one slot connected to a [`Signal`].
    ///
    /// The ID stays valid until the slot is disconnected or the signal is
    /// dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe notification channel with any number of connected slots.
///
/// `Args` is the payload passed to each slot by reference. Use `()` for
/// payload-free notifications and a tuple or small struct otherwise.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot to this signal.
    ///
    /// Returns a `ConnectionId` for [`disconnect`](Self::disconnect).
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connections.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Disconnect a specific slot.
    ///
    /// Returns `true` if the connection existed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.connections.lock().remove(id).is_some();
        tracing::trace!(target: targets::SIGNAL, ?id, removed, "slot disconnected");
        removed
    }

    /// Like [`disconnect`](Self::disconnect), reporting an unknown ID as an
    /// error.
    pub fn try_disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        if self.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Suppress emission while `blocked` is true.
    ///
    /// Emissions during a blocked period are dropped, not deferred.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether emission is currently suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "wrapview_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot that is disconnected when the returned guard drops.
    ///
    /// The guard holds a weak reference, so it never keeps the signal alive
    /// and is harmless if the signal is dropped first.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id,
        }
    }
}

/// Disconnects its slot when dropped.
///
/// Created by [`Signal::connect_scoped`].
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The connection this guard owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<usize>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<usize>: Send, Sync);
