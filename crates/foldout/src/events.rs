//! Input event types fed to the disclosure controllers.
//!
//! The host translates its native input events into these structures and
//! routes them to the controllers. Pointer events carry the full dispatch
//! path of the originating element (including any shadow boundaries the
//! host flattens into it), which is what outside-interaction detection
//! inspects. The engine never walks live geometry to answer "was this
//! click inside me".

use foldout_core::ElementId;

use crate::geometry::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// The keys the disclosure controllers react to.
///
/// Hosts map their native key codes onto this set; anything else arrives as
/// [`Key::Other`] and is ignored by the controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Enter,
    Space,
    Tab,
    Escape,
    /// A key the controllers do not handle.
    Other(u16),
}

impl Key {
    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
        )
    }

    /// Check if this key activates the element under focus.
    pub fn is_activation(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// Key press event, routed to a controller by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a key event with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }
}

/// A document-level pointer event.
///
/// `path` is the full dispatch path of the event: the element the pointer
/// hit first, followed by its ancestors up to the document root. Hosts
/// backed by an `ElementRegistry` can build it with
/// [`ElementRegistry::dispatch_path`](foldout_core::ElementRegistry::dispatch_path).
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// Dispatch path, innermost element first.
    pub path: Vec<ElementId>,
}

impl PointerEvent {
    /// Create a new pointer event.
    pub fn new(position: Point, path: Vec<ElementId>) -> Self {
        Self { position, path }
    }

    /// Check whether an element is on the dispatch path.
    pub fn path_contains(&self, element: ElementId) -> bool {
        self.path.contains(&element)
    }
}

/// Why an overlay or section left its open state.
///
/// Carried by close notifications so observers can distinguish user
/// dismissal from programmatic changes, and so focus handling can differ:
/// Escape, tab-out, and item selection return focus to the trigger, while
/// an outside click leaves focus where the user put it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// The Escape key was pressed.
    Escape,
    /// A pointer interaction landed outside the widget's subtree.
    OutsideClick,
    /// Focus left the widget via the Tab key.
    TabOut,
    /// The trigger was activated while open (toggle semantics).
    TriggerToggle,
    /// A focused item was activated.
    Selection,
    /// A sibling in the same exclusivity group opened.
    SiblingOpened,
    /// Closed by a direct API call.
    Programmatic,
}

impl DismissReason {
    /// Whether closing for this reason returns focus to the trigger.
    pub fn returns_focus(&self) -> bool {
        matches!(self, Self::Escape | Self::TabOut | Self::Selection)
    }
}
