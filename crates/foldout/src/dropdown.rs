//! Dropdown disclosure controller.
//!
//! This module provides [`DropdownController`], the state machine that
//! drives a trigger-plus-overlay dropdown: open/close/toggle transitions,
//! keyboard navigation over the overlay's focusable items, outside-click
//! dismissal, and overlay placement. It owns no rendering; every side
//! effect goes through the [`RenderSurface`] the host passes in.
//!
//! # Example
//!
//! ```ignore
//! use foldout::dropdown::{DisclosureFlags, DropdownController};
//!
//! let mut dropdown = DropdownController::new(&surface, trigger, content)?
//!     .with_flags(DisclosureFlags::DEFAULT | DisclosureFlags::FOCUS_FIRST_ON_OPEN);
//! dropdown.set_items(vec![item_a, item_b, item_c]);
//!
//! // Connect to signals
//! dropdown.closed.connect(|reason| {
//!     println!("Dropdown closed: {reason:?}");
//! });
//!
//! // Trigger activation toggles the overlay
//! dropdown.toggle(&mut surface);
//! ```
//!
//! # Sibling displacement
//!
//! When the controller belongs to a [`SharedExclusiveGroup`], opening it
//! displaces whichever sibling was open. The controller hides the
//! displaced element itself, then reports its id (from [`open`] directly,
//! or via [`take_displaced`] after a keyboard open) so the host can call
//! [`mark_closed`] on the displaced sibling's controller and keep its
//! state machine and document watch in sync.
//!
//! [`open`]: DropdownController::open
//! [`take_displaced`]: DropdownController::take_displaced
//! [`mark_closed`]: DropdownController::mark_closed

use std::ops::{BitAnd, BitOr, BitOrAssign};

use tracing::debug;

use foldout_core::logging::targets;
use foldout_core::{ElementId, Signal};

use crate::error::{Error, Result};
use crate::events::{DismissReason, Key, KeyEvent, PointerEvent};
use crate::group::SharedExclusiveGroup;
use crate::overlay::{DEFAULT_MARGIN, OverlayState};
use crate::surface::{RenderSurface, WatchToken};

// ============================================================================
// Disclosure Flags
// ============================================================================

/// Flags that control dropdown dismissal and focus behavior.
///
/// These flags can be combined using bitwise OR operations.
///
/// # Example
///
/// ```
/// use foldout::dropdown::DisclosureFlags;
///
/// let flags = DisclosureFlags::CLOSE_ON_ESCAPE | DisclosureFlags::RETURN_FOCUS_ON_CLOSE;
/// assert!(flags.close_on_escape());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisclosureFlags(u16);

impl DisclosureFlags {
    /// No special flags.
    pub const NONE: DisclosureFlags = DisclosureFlags(0);

    /// Close when Escape is pressed.
    pub const CLOSE_ON_ESCAPE: DisclosureFlags = DisclosureFlags(1 << 0);

    /// Close when a pointer interaction lands outside the widget subtree.
    pub const CLOSE_ON_OUTSIDE_CLICK: DisclosureFlags = DisclosureFlags(1 << 1);

    /// Close when focus leaves the widget via the Tab key.
    pub const CLOSE_ON_TAB_OUT: DisclosureFlags = DisclosureFlags(1 << 2);

    /// Return focus to the trigger when closing for a reason that warrants
    /// it (Escape, tab-out, item selection; never an outside click).
    pub const RETURN_FOCUS_ON_CLOSE: DisclosureFlags = DisclosureFlags(1 << 3);

    /// Schedule a focus move to the first item when the overlay opens.
    /// Applied through [`DropdownController::apply_pending_focus`] so the
    /// host can defer it past layout.
    pub const FOCUS_FIRST_ON_OPEN: DisclosureFlags = DisclosureFlags(1 << 4);

    /// Default flags for a standard dropdown.
    pub const DEFAULT: DisclosureFlags = DisclosureFlags(
        Self::CLOSE_ON_ESCAPE.0
            | Self::CLOSE_ON_OUTSIDE_CLICK.0
            | Self::CLOSE_ON_TAB_OUT.0
            | Self::RETURN_FOCUS_ON_CLOSE.0,
    );

    /// Check if a flag is set.
    pub fn has(&self, flag: DisclosureFlags) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Check if the dropdown closes on Escape.
    pub fn close_on_escape(&self) -> bool {
        self.has(Self::CLOSE_ON_ESCAPE)
    }

    /// Check if the dropdown closes on outside interaction.
    pub fn close_on_outside_click(&self) -> bool {
        self.has(Self::CLOSE_ON_OUTSIDE_CLICK)
    }

    /// Check if the dropdown closes when focus tabs out.
    pub fn close_on_tab_out(&self) -> bool {
        self.has(Self::CLOSE_ON_TAB_OUT)
    }

    /// Check if closing returns focus to the trigger.
    pub fn return_focus_on_close(&self) -> bool {
        self.has(Self::RETURN_FOCUS_ON_CLOSE)
    }

    /// Check if opening schedules a focus move to the first item.
    pub fn focus_first_on_open(&self) -> bool {
        self.has(Self::FOCUS_FIRST_ON_OPEN)
    }
}

impl BitOr for DisclosureFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DisclosureFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for DisclosureFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DisclosureFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DisclosureFlags(self.0 & rhs.0)
    }
}

// ============================================================================
// Dropdown State
// ============================================================================

/// The dropdown state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    /// Overlay hidden.
    #[default]
    Closed,
    /// Overlay visible, no item focused.
    Open,
    /// Overlay visible with the focus cursor on an item.
    OpenFocused(usize),
}

impl DropdownState {
    /// Whether the overlay is visible in this state.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

// ============================================================================
// Dropdown Controller
// ============================================================================

/// State machine for a trigger-plus-overlay dropdown.
///
/// The controller tracks one trigger element, one detached content
/// element, and an ordered list of focusable items inside the content.
/// State transitions run synchronously to completion; the only deferred
/// effect is the optional first-item focus move, which is re-checked
/// against "still open" before it is applied.
///
/// # Focus cursor
///
/// The cursor clamps at both ends: ArrowDown on the last item stays put.
/// (Tab selection wraps; that difference is deliberate, see
/// [`TabController`](crate::tabs::TabController).)
///
/// # Signals
///
/// - `opened(())`: emitted after the overlay is shown and placed
/// - `closed(DismissReason)`: emitted when the overlay leaves its open
///   state, with the reason
/// - `activated(i32)`: emitted when a focused item is activated
#[derive(Debug)]
pub struct DropdownController {
    /// The trigger element.
    trigger: ElementId,

    /// The detached overlay content element.
    content: ElementId,

    /// Focusable items inside the content, in navigation order.
    items: Vec<ElementId>,

    /// Current state.
    state: DropdownState,

    /// Behavior flags.
    flags: DisclosureFlags,

    /// Margin used for placement.
    margin: f32,

    /// Exclusivity group this dropdown belongs to, if any.
    group: Option<SharedExclusiveGroup>,

    /// Geometry snapshot for the visible overlay.
    overlay: Option<OverlayState>,

    /// Document-level listener registration while open.
    watch: Option<WatchToken>,

    /// Deferred focus move, applied only while still open.
    pending_focus: Option<usize>,

    /// Sibling displaced by the most recent open, until the host collects it.
    displaced: Option<ElementId>,

    /// Signal emitted after the overlay is shown and placed.
    pub opened: Signal<()>,
    /// Signal emitted when the overlay closes.
    pub closed: Signal<DismissReason>,
    /// Signal emitted when a focused item is activated.
    pub activated: Signal<i32>,
}

impl DropdownController {
    /// Create a controller for a trigger/content pair.
    ///
    /// Both elements must be measurable on the surface; a missing one is a
    /// configuration error and construction aborts.
    pub fn new<S: RenderSurface>(
        surface: &S,
        trigger: ElementId,
        content: ElementId,
    ) -> Result<Self> {
        if surface.measure(trigger).is_none() {
            return Err(Error::missing_element("trigger"));
        }
        if surface.measure(content).is_none() {
            return Err(Error::missing_element("content"));
        }

        Ok(Self {
            trigger,
            content,
            items: Vec::new(),
            state: DropdownState::Closed,
            flags: DisclosureFlags::DEFAULT,
            margin: DEFAULT_MARGIN,
            group: None,
            overlay: None,
            watch: None,
            pending_focus: None,
            displaced: None,
            opened: Signal::new(),
            closed: Signal::new(),
            activated: Signal::new(),
        })
    }

    /// Set the behavior flags using builder pattern.
    pub fn with_flags(mut self, flags: DisclosureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the placement margin using builder pattern.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    // =========================================================================
    // Group Membership
    // =========================================================================

    /// Join an exclusivity group shared with sibling dropdowns.
    ///
    /// The controller registers its content element as the group member.
    /// Fails if this dropdown is already registered there.
    pub fn join_group(&mut self, group: &SharedExclusiveGroup) -> Result<()> {
        group.lock().register(self.content)?;
        self.group = Some(group.clone());
        Ok(())
    }

    /// Leave the exclusivity group, if any.
    pub fn leave_group(&mut self) {
        if let Some(group) = self.group.take() {
            group.lock().unregister(self.content);
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Replace the focusable items, resetting the focus cursor if the
    /// overlay currently has one.
    pub fn set_items(&mut self, items: Vec<ElementId>) {
        self.items = items;
        if matches!(self.state, DropdownState::OpenFocused(_)) {
            self.state = DropdownState::Open;
        }
    }

    /// Append a focusable item.
    pub fn add_item(&mut self, item: ElementId) {
        self.items.push(item);
    }

    /// Number of focusable items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The trigger element.
    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// The overlay content element.
    pub fn content(&self) -> ElementId {
        self.content
    }

    /// Current state.
    pub fn state(&self) -> DropdownState {
        self.state
    }

    /// Whether the overlay is visible.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// The focus cursor index, or -1 when no item is focused.
    pub fn focus_index(&self) -> i32 {
        match self.state {
            DropdownState::OpenFocused(i) => i as i32,
            _ => -1,
        }
    }

    /// The geometry snapshot the overlay was last placed against.
    ///
    /// `None` while the overlay is hidden; the snapshot is discarded on
    /// close, never persisted.
    pub fn overlay_state(&self) -> Option<OverlayState> {
        self.overlay
    }

    /// The sibling displaced by the most recent open, if the host has not
    /// collected it yet. The host routes [`mark_closed`](Self::mark_closed)
    /// to the controller owning that element.
    pub fn take_displaced(&mut self) -> Option<ElementId> {
        self.displaced.take()
    }

    // =========================================================================
    // Open/Close Operations
    // =========================================================================

    /// Show the overlay.
    ///
    /// Resolves exclusivity first, then shows the content, measures it,
    /// and applies placement. No-op when already open. Returns the
    /// displaced sibling, if any.
    pub fn open<S: RenderSurface>(&mut self, surface: &mut S) -> Option<ElementId> {
        if self.is_open() {
            return None;
        }

        let displaced = self
            .group
            .as_ref()
            .and_then(|group| group.lock().notify_opened(self.content));
        if let Some(sibling) = displaced {
            surface.set_visible(sibling, false);
        }

        self.state = DropdownState::Open;
        surface.set_visible(self.content, true);
        // Measure after showing: visibility can change the measured size.
        self.refresh_placement(surface);
        self.watch = Some(surface.watch_document(self.content));

        if self.flags.focus_first_on_open() && !self.items.is_empty() {
            self.pending_focus = Some(0);
        }

        debug!(target: targets::CONTROLLER, content = ?self.content, "dropdown opened");
        self.opened.emit(());

        self.displaced = displaced;
        displaced
    }

    /// Hide the overlay for the given reason. No-op when already closed.
    pub fn close<S: RenderSurface>(&mut self, surface: &mut S, reason: DismissReason) {
        if !self.is_open() {
            return;
        }

        self.state = DropdownState::Closed;
        self.overlay = None;
        self.pending_focus = None;

        surface.set_visible(self.content, false);
        if let Some(token) = self.watch.take() {
            surface.unwatch_document(token);
        }
        if let Some(group) = &self.group {
            group.lock().notify_closed(self.content);
        }
        if reason.returns_focus() && self.flags.return_focus_on_close() {
            surface.move_focus(self.trigger);
        }

        debug!(target: targets::CONTROLLER, content = ?self.content, ?reason, "dropdown closed");
        self.closed.emit(reason);
    }

    /// Toggle the overlay (trigger activation semantics). Returns the
    /// displaced sibling when this call opened the overlay.
    pub fn toggle<S: RenderSurface>(&mut self, surface: &mut S) -> Option<ElementId> {
        if self.is_open() {
            self.close(surface, DismissReason::TriggerToggle);
            None
        } else {
            self.open(surface)
        }
    }

    /// Synchronize after a sibling in the same group displaced this
    /// dropdown. The sibling's controller already hid the content; this
    /// only settles local state and releases the document watch.
    pub fn mark_closed<S: RenderSurface>(&mut self, surface: &mut S) {
        if !self.is_open() {
            return;
        }

        self.state = DropdownState::Closed;
        self.overlay = None;
        self.pending_focus = None;
        if let Some(token) = self.watch.take() {
            surface.unwatch_document(token);
        }

        debug!(target: targets::CONTROLLER, content = ?self.content, "dropdown displaced");
        self.closed.emit(DismissReason::SiblingOpened);
    }

    /// Recompute placement from fresh geometry. The host calls this on
    /// scroll and resize while the overlay is visible; it is a no-op once
    /// the overlay closed, so a stale notification cannot move a hidden
    /// panel.
    pub fn reposition<S: RenderSurface>(&mut self, surface: &mut S) {
        if !self.is_open() {
            return;
        }
        self.refresh_placement(surface);
    }

    fn refresh_placement<S: RenderSurface>(&mut self, surface: &mut S) {
        let Some(anchor) = surface.measure(self.trigger) else {
            return;
        };
        let Some(content_rect) = surface.measure(self.content) else {
            return;
        };

        let state = OverlayState::new(anchor, content_rect.size, surface.viewport());
        let placement = state.placement(self.margin);
        self.overlay = Some(state);
        surface.set_position(
            self.content,
            placement.top,
            placement.left,
            placement.max_width,
        );
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move the focus cursor to an item and focus its element.
    fn focus_item<S: RenderSurface>(&mut self, surface: &mut S, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.state = DropdownState::OpenFocused(index);
        surface.move_focus(self.items[index]);
    }

    /// Apply a deferred focus move scheduled by an earlier open.
    ///
    /// Returns `true` if focus moved. A dropdown that closed in the
    /// meantime discards the pending move instead of focusing a hidden
    /// item.
    pub fn apply_pending_focus<S: RenderSurface>(&mut self, surface: &mut S) -> bool {
        let Some(index) = self.pending_focus.take() else {
            return false;
        };
        if !self.is_open() || index >= self.items.len() {
            return false;
        }
        self.focus_item(surface, index);
        true
    }

    // =========================================================================
    // Input Handling
    // =========================================================================

    /// Handle a key event routed to this dropdown.
    ///
    /// Returns `true` when the event was consumed. Tab is deliberately
    /// reported as not consumed even though it closes the overlay and
    /// returns focus to the trigger: the host's focus traversal should
    /// continue from there.
    pub fn handle_key<S: RenderSurface>(&mut self, surface: &mut S, event: &KeyEvent) -> bool {
        match self.state {
            DropdownState::Closed => match event.key {
                Key::Enter | Key::Space => {
                    self.open(surface);
                    true
                }
                Key::ArrowDown => {
                    self.open(surface);
                    self.pending_focus = None;
                    self.focus_item(surface, 0);
                    true
                }
                _ => false,
            },
            DropdownState::Open => match event.key {
                Key::Enter | Key::Space => {
                    self.close(surface, DismissReason::TriggerToggle);
                    true
                }
                Key::ArrowDown => {
                    self.focus_item(surface, 0);
                    true
                }
                Key::Escape => self.handle_escape(surface),
                Key::Tab => self.handle_tab_out(surface),
                _ => false,
            },
            DropdownState::OpenFocused(index) => match event.key {
                Key::ArrowDown => {
                    // Clamp at the end, no wraparound.
                    if index + 1 < self.items.len() {
                        self.focus_item(surface, index + 1);
                    }
                    true
                }
                Key::ArrowUp => {
                    if index > 0 {
                        self.focus_item(surface, index - 1);
                    }
                    true
                }
                Key::Home => {
                    self.focus_item(surface, 0);
                    true
                }
                Key::End => {
                    if !self.items.is_empty() {
                        let last = self.items.len() - 1;
                        self.focus_item(surface, last);
                    }
                    true
                }
                Key::Enter | Key::Space => {
                    self.activated.emit(index as i32);
                    self.close(surface, DismissReason::Selection);
                    true
                }
                Key::Escape => self.handle_escape(surface),
                Key::Tab => self.handle_tab_out(surface),
                _ => false,
            },
        }
    }

    fn handle_escape<S: RenderSurface>(&mut self, surface: &mut S) -> bool {
        if !self.flags.close_on_escape() {
            return false;
        }
        self.close(surface, DismissReason::Escape);
        true
    }

    fn handle_tab_out<S: RenderSurface>(&mut self, surface: &mut S) -> bool {
        if self.flags.close_on_tab_out() {
            self.close(surface, DismissReason::TabOut);
        }
        false
    }

    /// Handle a document-level pointer event.
    ///
    /// Closes the overlay when the event's dispatch path contains neither
    /// the trigger nor the content subtree. Focus is left where the user
    /// put it. Returns `true` when the dropdown closed.
    pub fn handle_outside_interaction<S: RenderSurface>(
        &mut self,
        surface: &mut S,
        event: &PointerEvent,
    ) -> bool {
        if !self.is_open() || !self.flags.close_on_outside_click() {
            return false;
        }
        if event.path_contains(self.trigger) || event.path_contains(self.content) {
            return false;
        }

        self.close(surface, DismissReason::OutsideClick);
        true
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release everything on unmount: hide the overlay, drop the document
    /// watch, leave the exclusivity group. No close signal is emitted:
    /// the widget is going away, not being dismissed. Safe to call more
    /// than once.
    pub fn release<S: RenderSurface>(&mut self, surface: &mut S) {
        if self.is_open() {
            surface.set_visible(self.content, false);
        }
        if let Some(token) = self.watch.take() {
            surface.unwatch_document(token);
        }
        self.state = DropdownState::Closed;
        self.overlay = None;
        self.pending_focus = None;
        self.leave_group();
    }
}

static_assertions::assert_impl_all!(DropdownController: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ViewportBounds};
    use crate::group::ExclusiveGroup;
    use crate::surface::mock::MockSurface;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    fn setup() -> (MockSurface, DropdownController) {
        let mut surface = MockSurface::new(ViewportBounds::new(1024.0, 768.0));
        let trigger = surface.add_element(Rect::new(400.0, 100.0, 100.0, 30.0));
        let content = surface.add_element(Rect::new(0.0, 0.0, 200.0, 150.0));
        let controller = DropdownController::new(&surface, trigger, content).unwrap();
        (surface, controller)
    }

    fn with_items(surface: &mut MockSurface, controller: &mut DropdownController, count: usize) {
        let items = (0..count)
            .map(|i| surface.add_element(Rect::new(0.0, i as f32 * 24.0, 200.0, 24.0)))
            .collect();
        controller.set_items(items);
    }

    #[test]
    fn test_missing_element_is_fatal() {
        let mut surface = MockSurface::new(ViewportBounds::new(800.0, 600.0));
        let trigger = surface.add_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let ghost = surface.add_unmeasurable();

        let err = DropdownController::new(&surface, ghost, trigger).unwrap_err();
        assert!(matches!(err, Error::MissingElement { role: "trigger" }));

        let err = DropdownController::new(&surface, trigger, ghost).unwrap_err();
        assert!(matches!(err, Error::MissingElement { role: "content" }));
    }

    #[test]
    fn test_open_shows_places_and_watches() {
        let (mut surface, mut controller) = setup();
        let content = controller.content();

        controller.open(&mut surface);

        assert!(controller.is_open());
        assert_eq!(surface.visible_count(content), 1);
        // Anchor bottom 130 + margin 8, centered at 400.
        assert_eq!(surface.last_position(content), Some((138.0, 350.0, 1008.0)));
        assert_eq!(surface.active_watches.len(), 1);
        assert!(controller.overlay_state().is_some());
    }

    #[test]
    fn test_open_is_idempotent() {
        let (mut surface, mut controller) = setup();
        let opened = Arc::new(AtomicUsize::new(0));
        let opened_clone = opened.clone();
        controller.opened.connect(move |()| {
            opened_clone.fetch_add(1, Ordering::SeqCst);
        });

        controller.open(&mut surface);
        controller.open(&mut surface);

        assert_eq!(opened.load(Ordering::SeqCst), 1);
        assert_eq!(surface.visible_count(controller.content()), 1);
    }

    #[test]
    fn test_toggle_closes_without_forcing_focus() {
        let (mut surface, mut controller) = setup();
        let trigger = controller.trigger();

        controller.toggle(&mut surface);
        assert!(controller.is_open());
        controller.toggle(&mut surface);

        assert!(!controller.is_open());
        assert_eq!(surface.hidden_count(controller.content()), 1);
        assert_eq!(surface.focus_count(trigger), 0);
    }

    #[test]
    fn test_escape_returns_focus_and_releases_watch() {
        let (mut surface, mut controller) = setup();
        let trigger = controller.trigger();

        controller.open(&mut surface);
        let consumed = controller.handle_key(&mut surface, &KeyEvent::plain(Key::Escape));

        assert!(consumed);
        assert!(!controller.is_open());
        assert_eq!(surface.focus_count(trigger), 1);
        assert!(surface.active_watches.is_empty());
    }

    #[test]
    fn test_outside_click_closes_without_focus() {
        let (mut surface, mut controller) = setup();
        let elsewhere = surface.add_element(Rect::new(900.0, 700.0, 10.0, 10.0));

        let reason = Arc::new(AtomicI32::new(-1));
        let reason_clone = reason.clone();
        controller.closed.connect(move |r| {
            reason_clone.store(
                matches!(r, DismissReason::OutsideClick) as i32,
                Ordering::SeqCst,
            );
        });

        controller.open(&mut surface);
        let event = PointerEvent::new(crate::geometry::Point::ZERO, vec![elsewhere]);
        let closed = controller.handle_outside_interaction(&mut surface, &event);

        assert!(closed);
        assert!(!controller.is_open());
        assert_eq!(reason.load(Ordering::SeqCst), 1);
        // Unlike Escape, no focus command is issued anywhere.
        assert_eq!(surface.focus_count(controller.trigger()), 0);
    }

    #[test]
    fn test_click_inside_subtree_does_not_close() {
        let (mut surface, mut controller) = setup();
        controller.open(&mut surface);

        let event = PointerEvent::new(crate::geometry::Point::ZERO, vec![controller.content()]);
        assert!(!controller.handle_outside_interaction(&mut surface, &event));
        assert!(controller.is_open());
    }

    #[test]
    fn test_focus_cursor_clamps_at_ends() {
        let (mut surface, mut controller) = setup();
        with_items(&mut surface, &mut controller, 3);

        controller.open(&mut surface);
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        assert_eq!(controller.focus_index(), 0);

        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        assert_eq!(controller.focus_index(), 2);

        // Clamped: a further ArrowDown stays on the last item.
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        assert_eq!(controller.focus_index(), 2);

        // ArrowUp walks back and clamps at the start.
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowUp));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowUp));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowUp));
        assert_eq!(controller.focus_index(), 0);
    }

    #[test]
    fn test_home_end_jump() {
        let (mut surface, mut controller) = setup();
        with_items(&mut surface, &mut controller, 4);

        controller.open(&mut surface);
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::End));
        assert_eq!(controller.focus_index(), 3);

        controller.handle_key(&mut surface, &KeyEvent::plain(Key::Home));
        assert_eq!(controller.focus_index(), 0);
    }

    #[test]
    fn test_activation_emits_and_closes_with_focus_return() {
        let (mut surface, mut controller) = setup();
        with_items(&mut surface, &mut controller, 3);
        let trigger = controller.trigger();

        let activated = Arc::new(AtomicI32::new(-1));
        let activated_clone = activated.clone();
        controller.activated.connect(move |&index| {
            activated_clone.store(index, Ordering::SeqCst);
        });

        controller.open(&mut surface);
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        controller.handle_key(&mut surface, &KeyEvent::plain(Key::Enter));

        assert_eq!(activated.load(Ordering::SeqCst), 1);
        assert!(!controller.is_open());
        assert_eq!(surface.focus_count(trigger), 1);
    }

    #[test]
    fn test_tab_closes_but_is_not_consumed() {
        let (mut surface, mut controller) = setup();
        controller.open(&mut surface);

        let consumed = controller.handle_key(&mut surface, &KeyEvent::plain(Key::Tab));
        assert!(!consumed);
        assert!(!controller.is_open());
        assert_eq!(surface.focus_count(controller.trigger()), 1);
    }

    #[test]
    fn test_arrow_down_from_closed_opens_and_focuses() {
        let (mut surface, mut controller) = setup();
        with_items(&mut surface, &mut controller, 2);

        controller.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowDown));
        assert_eq!(controller.state(), DropdownState::OpenFocused(0));
    }

    #[test]
    fn test_pending_focus_discarded_after_close() {
        let (mut surface, mut controller) = setup();
        with_items(&mut surface, &mut controller, 2);
        controller = controller
            .with_flags(DisclosureFlags::DEFAULT | DisclosureFlags::FOCUS_FIRST_ON_OPEN);
        let first_item = controller.items[0];

        controller.open(&mut surface);
        controller.close(&mut surface, DismissReason::Programmatic);

        // The focus move scheduled by open() must not land after close.
        assert!(!controller.apply_pending_focus(&mut surface));
        assert_eq!(surface.focus_count(first_item), 0);

        controller.open(&mut surface);
        assert!(controller.apply_pending_focus(&mut surface));
        assert_eq!(surface.focus_count(first_item), 1);
    }

    #[test]
    fn test_reposition_tracks_fresh_geometry() {
        let (mut surface, mut controller) = setup();
        let content = controller.content();
        controller.open(&mut surface);

        // Anchor scrolled down near the bottom edge: placement must flip.
        surface.set_rect(controller.trigger(), Rect::new(500.0, 700.0, 100.0, 30.0));
        surface.set_rect(content, Rect::new(0.0, 0.0, 200.0, 100.0));
        controller.reposition(&mut surface);

        let (top, _, _) = surface.last_position(content).unwrap();
        assert_eq!(top, 592.0);
    }

    #[test]
    fn test_reposition_after_close_is_noop() {
        let (mut surface, mut controller) = setup();
        controller.open(&mut surface);
        controller.close(&mut surface, DismissReason::Programmatic);

        let before = surface.commands.len();
        controller.reposition(&mut surface);
        assert_eq!(surface.commands.len(), before);
        assert_eq!(controller.overlay_state(), None);
    }

    #[test]
    fn test_release_is_idempotent() {
        let (mut surface, mut controller) = setup();
        controller.open(&mut surface);

        controller.release(&mut surface);
        controller.release(&mut surface);

        assert!(!controller.is_open());
        assert!(surface.active_watches.is_empty());
        assert_eq!(surface.hidden_count(controller.content()), 1);
    }

    #[test]
    fn test_group_displacement_flow() {
        let mut surface = MockSurface::new(ViewportBounds::new(1024.0, 768.0));
        let trigger_a = surface.add_element(Rect::new(10.0, 10.0, 80.0, 24.0));
        let content_a = surface.add_element(Rect::new(0.0, 0.0, 160.0, 120.0));
        let trigger_b = surface.add_element(Rect::new(100.0, 10.0, 80.0, 24.0));
        let content_b = surface.add_element(Rect::new(0.0, 0.0, 160.0, 120.0));

        let group = ExclusiveGroup::new().into_shared();
        let mut a = DropdownController::new(&surface, trigger_a, content_a).unwrap();
        let mut b = DropdownController::new(&surface, trigger_b, content_b).unwrap();
        a.join_group(&group).unwrap();
        b.join_group(&group).unwrap();

        let reasons = Arc::new(AtomicUsize::new(0));
        let reasons_clone = reasons.clone();
        a.closed.connect(move |reason| {
            if matches!(reason, DismissReason::SiblingOpened) {
                reasons_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        a.open(&mut surface);
        let displaced = b.open(&mut surface);

        // A's content was hidden exactly once, by B's open.
        assert_eq!(displaced, Some(content_a));
        assert_eq!(surface.hidden_count(content_a), 1);
        assert_eq!(group.lock().open_member(), Some(content_b));

        // Host routes the displacement back to A's controller.
        a.mark_closed(&mut surface);
        assert!(!a.is_open());
        assert_eq!(reasons.load(Ordering::SeqCst), 1);
        // A's document watch was released along with the displacement.
        assert_eq!(surface.active_watches.len(), 1);
    }

    #[test]
    fn test_duplicate_group_membership_rejected() {
        let (surface, mut controller) = setup();
        let group = ExclusiveGroup::new().into_shared();

        controller.join_group(&group).unwrap();
        let err = controller.join_group(&group).unwrap_err();
        assert!(matches!(err, Error::DuplicateMember { .. }));
        let _ = surface;
    }
}
