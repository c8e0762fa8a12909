//! Collision-free overlay placement.
//!
//! This module computes where a detached overlay panel goes: centered under
//! its anchor, clamped into the viewport horizontally, flipped above the
//! anchor when there is no room below. The computation is a pure function
//! of its inputs: it never queries live geometry and never mutates its
//! arguments, so the caller is responsible for taking a fresh snapshot
//! before each call. Order matters there: show the content first, then
//! measure it, then place, because showing content can change its measured
//! size.
//!
//! # Example
//!
//! ```
//! use foldout::geometry::{Rect, Size, ViewportBounds};
//! use foldout::overlay::{DEFAULT_MARGIN, place};
//!
//! let anchor = Rect::new(100.0, 40.0, 80.0, 24.0);
//! let content = Size::new(160.0, 200.0);
//! let viewport = ViewportBounds::new(1024.0, 768.0);
//!
//! let placement = place(anchor, content, viewport, DEFAULT_MARGIN);
//! assert_eq!(placement.top, 72.0); // below the anchor
//! ```

use tracing::trace;

use foldout_core::logging::targets;

use crate::geometry::{Rect, Size, ViewportBounds};

/// Default gap between the overlay, its anchor, and the viewport edges.
pub const DEFAULT_MARGIN: f32 = 8.0;

/// A resolved overlay position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top edge of the overlay, in viewport coordinates.
    pub top: f32,
    /// Left edge of the overlay, in viewport coordinates.
    pub left: f32,
    /// Width cap the host must apply so long content never exceeds the
    /// viewport.
    pub max_width: f32,
}

/// Compute a collision-free position for an overlay panel.
///
/// The overlay is centered horizontally under the anchor and placed just
/// below it. If it would cross the right viewport edge it is shifted left;
/// if it then crosses the left edge it is clamped to `margin` (the
/// `max_width` cap keeps oversized content inside the viewport). If it
/// would cross the bottom edge it flips above the anchor, but only when it
/// actually fits there; otherwise it is pushed up just enough to clear the
/// bottom edge, which may overlap the anchor. That is the accepted
/// degenerate case for content taller than the space on either side,
/// and it is not corrected further. No input ever
/// makes this fail: out-of-viewport results are clamped, not rejected.
pub fn place(anchor: Rect, content: Size, viewport: ViewportBounds, margin: f32) -> Placement {
    // Horizontal candidate: centered under the anchor.
    let mut left = anchor.origin.x + (anchor.width() - content.width) / 2.0;

    // Shift left off the right edge, then clamp to the left margin.
    if left + content.width > viewport.width - margin {
        left = viewport.width - content.width - margin;
    }
    if left < margin {
        left = margin;
    }

    // Vertical candidate: just below the anchor.
    let mut top = anchor.bottom() + margin;

    if top + content.height > viewport.height - margin {
        let above_top = anchor.top() - content.height - margin;
        if above_top > 0.0 {
            top = above_top;
        } else {
            top = viewport.height - content.height - margin;
        }
    }

    let max_width = viewport.width - 2.0 * margin;

    trace!(
        target: targets::PLACEMENT,
        top, left, max_width, "overlay placed"
    );

    Placement {
        top,
        left,
        max_width,
    }
}

/// Snapshot of the geometry an open overlay was last placed against.
///
/// Captured when the overlay is shown, replaced wholesale on every
/// scroll/resize recomputation while it stays visible, and discarded on
/// hide. It is never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    /// The anchor (trigger) rectangle.
    pub anchor: Rect,
    /// Measured content size.
    pub content: Size,
    /// Viewport bounds at capture time.
    pub viewport: ViewportBounds,
}

impl OverlayState {
    /// Capture a new snapshot.
    pub fn new(anchor: Rect, content: Size, viewport: ViewportBounds) -> Self {
        Self {
            anchor,
            content,
            viewport,
        }
    }

    /// Resolve this snapshot to a placement.
    pub fn placement(&self, margin: f32) -> Placement {
        place(self.anchor, self.content, self.viewport, margin)
    }
}
