//! Prelude module for Foldout.
//!
//! This module re-exports the most commonly used types for convenient
//! importing:
//!
//! ```ignore
//! use foldout::prelude::*;
//! ```

// ============================================================================
// Core Systems
// ============================================================================

pub use foldout_core::{ConnectionId, ElementId, ElementRegistry, Signal};

// ============================================================================
// Geometry
// ============================================================================

pub use crate::geometry::{Point, Rect, Size, ViewportBounds};

// ============================================================================
// Events
// ============================================================================

pub use crate::events::{DismissReason, Key, KeyEvent, KeyboardModifiers, PointerEvent};

// ============================================================================
// Rendering Seam
// ============================================================================

pub use crate::surface::{RenderSurface, WatchToken};

// ============================================================================
// Coordination and Placement
// ============================================================================

pub use crate::group::{ExclusiveGroup, SharedExclusiveGroup};
pub use crate::overlay::{DEFAULT_MARGIN, OverlayState, Placement, place};

// ============================================================================
// Controllers
// ============================================================================

pub use crate::accordion::AccordionController;
pub use crate::dropdown::{DisclosureFlags, DropdownController, DropdownState};
pub use crate::tabs::TabController;

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{Error, Result};
