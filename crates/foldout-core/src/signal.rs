//! Signal/slot notifications for Foldout.
//!
//! This module provides a type-safe signal/slot mechanism for change
//! notification. Signals are emitted by coordinators and controllers when
//! their state changes, and connected slots (callbacks) are invoked in
//! response.
//!
//! Slots are always invoked directly, on the emitting thread, before
//! [`Signal::emit`] returns. The engine's state transitions run to
//! completion on the thread that received the originating input event, so
//! there is no queued or cross-thread delivery here; `Signal` is still
//! `Send + Sync` so it can live inside shared coordinator handles.
//!
//! # Example
//!
//! ```
//! use foldout_core::Signal;
//!
//! // Create a signal that passes an index argument
//! let current_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = current_changed.connect(|index| {
//!     println!("Selection moved to {index}");
//! });
//!
//! // Emit the signal
//! current_changed.emit(2);
//!
//! // Disconnect when done
//! current_changed.disconnect(conn_id).unwrap();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::SignalError;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this id to disconnect a specific connection via
    /// [`Signal::disconnect`]. The id remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// Internal storage for a single connection.
struct Connection<Args> {
    /// The slot function to invoke (Arc-wrapped so emission can run
    /// without holding the connection lock).
    slot: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked with a
/// reference to the provided argument, in connection order.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for
///   signals with no arguments, or a tuple like `(ElementId, bool)` for
///   multiple arguments.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect the slot
    /// later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        connections.insert(Connection {
            slot: Arc::new(slot),
        })
    }

    /// Disconnect a previously connected slot.
    ///
    /// Returns [`SignalError::InvalidConnection`] if the id was never
    /// connected or has already been disconnected.
    pub fn disconnect(&self, id: ConnectionId) -> Result<(), SignalError> {
        let mut connections = self.connections.lock();
        if connections.remove(id).is_some() {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Emit the signal, invoking every connected slot with `args`.
    ///
    /// Slots run on the calling thread, after the connection lock has been
    /// released, so a slot may connect or disconnect other slots without
    /// deadlocking. Emission is a no-op while the signal is blocked.
    pub fn emit(&self, args: Args) {
        if self.blocked.load(Ordering::Acquire) {
            return;
        }

        // Snapshot the slots so the lock is not held during invocation.
        let slots: Vec<Arc<dyn Fn(&Args) + Send + Sync>> = {
            let connections = self.connections.lock();
            connections.values().map(|c| Arc::clone(&c.slot)).collect()
        };

        for slot in slots {
            slot(&args);
        }
    }

    /// Get the number of active connections.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Check whether any slot is connected.
    pub fn has_connections(&self) -> bool {
        self.connection_count() > 0
    }

    /// Temporarily block emission. Blocked signals drop emitted values.
    pub fn block(&self) {
        self.blocked.store(true, Ordering::Release);
    }

    /// Re-enable emission after a call to [`block`](Self::block).
    pub fn unblock(&self) {
        self.blocked.store(false, Ordering::Release);
    }

    /// Check whether emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Relaxed))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<(i32, bool)>: Send, Sync);
