//! Core systems for Foldout.
//!
//! This crate provides the foundational components of the Foldout
//! disclosure engine:
//!
//! - **Signal/Slot System**: Type-safe change notification
//! - **Element Identity**: Opaque ids for host elements, with an explicitly
//!   scoped registry providing parent chains for event dispatch paths
//! - **Error Types**: The core error taxonomy
//! - **Logging**: `tracing` targets and span names for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use foldout_core::Signal;
//!
//! // Create a signal that notifies when a selection changes
//! let current_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = current_changed.connect(|index| {
//!     println!("Selection moved to: {}", index);
//! });
//!
//! // Emit the signal
//! current_changed.emit(1);
//!
//! // Disconnect when done
//! current_changed.disconnect(conn_id).unwrap();
//! ```
//!
//! # Element Registry Example
//!
//! ```
//! use foldout_core::ElementRegistry;
//!
//! let mut registry = ElementRegistry::new();
//! let root = registry.insert(None);
//! let panel = registry.insert(Some(root));
//!
//! assert_eq!(registry.dispatch_path(panel), vec![panel, root]);
//! ```

mod element;
mod error;
pub mod logging;
pub mod signal;

pub use element::{ElementId, ElementRegistry};
pub use error::{CoreError, ElementError, Result, SignalError};
pub use signal::{ConnectionId, Signal};
