//! Disclosure coordination and overlay placement for UI toolkits.
//!
//! Foldout is the logic layer behind disclosure widgets: dropdowns, tab
//! strips, and accordions. It owns the parts that are easy to get subtly
//! wrong and hard to test inside a rendering tree:
//!
//! - **Exclusivity**: at most one member of a sibling group is open at a
//!   time, enforced centrally by [`group::ExclusiveGroup`]
//! - **Placement**: collision-free overlay positioning against the
//!   viewport, computed by the pure functions in [`overlay`]
//! - **Navigation**: keyboard-driven open/close/focus state machines in
//!   [`dropdown`], [`tabs`], and [`accordion`]
//!
//! Everything that touches a real rendering tree goes through the narrow
//! [`surface::RenderSurface`] trait, so the engine runs unchanged against
//! any host, and against plain mocks in tests. There is no global state:
//! registries, groups, and controllers are explicitly constructed and
//! explicitly scoped.
//!
//! # Example
//!
//! ```ignore
//! use foldout::prelude::*;
//!
//! // The host implements RenderSurface over its rendering tree.
//! let mut surface = MySurface::new();
//! let trigger = surface.register_trigger();
//! let content = surface.register_overlay();
//!
//! let mut dropdown = DropdownController::new(&surface, trigger, content)?;
//! dropdown.set_items(surface.menu_items());
//!
//! // Route input events to the controller.
//! dropdown.toggle(&mut surface);
//! dropdown.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
//! ```
//!
//! # Event model
//!
//! The engine is single-threaded and event-driven: every call runs to
//! completion before the host dispatches the next event, and nothing here
//! blocks. Scroll/resize coalescing belongs to the host; the controllers
//! just recompute from fresh snapshots when told to.

pub mod accordion;
pub mod dropdown;
pub mod error;
pub mod events;
pub mod geometry;
pub mod group;
pub mod overlay;
pub mod prelude;
pub mod surface;
pub mod tabs;

pub use accordion::AccordionController;
pub use dropdown::{DisclosureFlags, DropdownController, DropdownState};
pub use error::{Error, Result};
pub use events::{DismissReason, Key, KeyEvent, KeyboardModifiers, PointerEvent};
pub use geometry::{Point, Rect, Size, ViewportBounds};
pub use group::{ExclusiveGroup, SharedExclusiveGroup};
pub use overlay::{DEFAULT_MARGIN, OverlayState, Placement, place};
pub use surface::{RenderSurface, WatchToken};
pub use tabs::TabController;

// Re-export the core crate for hosts that need element registries or raw
// signals without adding a second dependency.
pub use foldout_core as core;
