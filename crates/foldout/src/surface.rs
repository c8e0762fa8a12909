//! The rendering-collaborator seam.
//!
//! The engine owns state machines and geometry math; everything that
//! touches a real rendering tree goes through [`RenderSurface`]. Controllers
//! are generic over the trait, so the whole engine is unit-testable against
//! a plain in-memory implementation and no rendering technology leaks in.
//!
//! A host implementation typically wraps its element store:
//!
//! ```ignore
//! struct DomSurface {
//!     registry: ElementRegistry,
//!     nodes: HashMap<ElementId, DomNode>,
//!     next_watch: u64,
//! }
//!
//! impl RenderSurface for DomSurface {
//!     fn measure(&self, element: ElementId) -> Option<Rect> {
//!         self.nodes.get(&element).map(|n| n.bounding_rect())
//!     }
//!
//!     fn viewport(&self) -> ViewportBounds {
//!         self.window_size()
//!     }
//!
//!     // ...
//! }
//! ```
//!
//! Resize and scroll notifications are not part of the trait: the host
//! observes them itself (coalescing or throttling as it sees fit) and calls
//! `reposition` on the controllers whose overlays are visible.

use foldout_core::ElementId;

use crate::geometry::{Rect, ViewportBounds};

/// An opaque handle for a document-level listener registration.
///
/// Returned by [`RenderSurface::watch_document`] and handed back through
/// [`RenderSurface::unwatch_document`]. Controllers acquire one token per
/// open overlay and release it on close or unmount, so listener lifetime
/// matches overlay visibility exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchToken(u64);

impl WatchToken {
    /// Create a token. Hosts pick the value; controllers never inspect it.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value the host stored in this token.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// The narrow interface the engine consumes from the rendering layer.
///
/// Geometry queries return fresh snapshots; the engine never caches them
/// across events. `measure` returns `None` for elements the surface no
/// longer knows, which controllers treat as "degrade to no-op" at runtime
/// (and as a fatal configuration error at construction time).
pub trait RenderSurface {
    /// Measure an element's rectangle in viewport coordinates.
    fn measure(&self, element: ElementId) -> Option<Rect>;

    /// Current viewport bounds.
    fn viewport(&self) -> ViewportBounds;

    /// Show or hide an element.
    fn set_visible(&mut self, element: ElementId, visible: bool);

    /// Move keyboard focus to an element.
    fn move_focus(&mut self, element: ElementId);

    /// Position a detached overlay element and cap its width.
    fn set_position(&mut self, element: ElementId, top: f32, left: f32, max_width: f32);

    /// Register a document-level pointer/keyboard listener for an open
    /// overlay. Events it observes are routed back to the owning
    /// controller's `handle_outside_interaction`/`handle_key`.
    fn watch_document(&mut self, overlay: ElementId) -> WatchToken;

    /// Remove a previously registered document-level listener.
    ///
    /// Must tolerate tokens that were already released.
    fn unwatch_document(&mut self, token: WatchToken);
}
