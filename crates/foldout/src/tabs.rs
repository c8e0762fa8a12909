//! Tab selection controller.
//!
//! This module provides [`TabController`], which coordinates a row of tab
//! triggers with their panels: activating a trigger selects its panel
//! exclusively within the group, and `next`/`previous` move the selection
//! circularly. That wraparound is deliberate and differs from the dropdown
//! focus cursor, which clamps at its ends.
//!
//! # Example
//!
//! ```ignore
//! use foldout::tabs::TabController;
//!
//! let mut tabs = TabController::new();
//! tabs.add_tab(general_trigger, general_panel)?;
//! tabs.add_tab(network_trigger, network_panel)?;
//! tabs.add_tab(advanced_trigger, advanced_panel)?;
//!
//! tabs.current_changed.connect(|&index| {
//!     println!("Active tab: {index}");
//! });
//!
//! tabs.select_tab(&mut surface, 0);
//! tabs.next_tab(&mut surface); // index 1
//! ```

use tracing::debug;

use foldout_core::logging::targets;
use foldout_core::{ElementId, Signal};

use crate::error::Result;
use crate::events::{Key, KeyEvent};
use crate::group::ExclusiveGroup;
use crate::surface::RenderSurface;

/// One trigger/panel pair.
#[derive(Debug, Clone, Copy)]
struct TabPage {
    /// The tab's trigger element.
    trigger: ElementId,
    /// The tab's panel element.
    panel: ElementId,
    /// Whether this tab can be selected.
    enabled: bool,
}

/// Coordinates exclusive panel selection for a tab strip.
///
/// Panels are members of an owned [`ExclusiveGroup`]; selection goes
/// through the group so the at-most-one-open invariant is enforced in one
/// place. Selecting a tab shows its panel, hides the displaced one, and
/// moves focus to the newly active trigger.
///
/// Index-based operations return `false` for indices outside `[0, count)`,
/// for disabled tabs, and for selections that would not change anything.
///
/// # Signals
///
/// - `current_changed(i32)`: emitted when the active tab changes
pub struct TabController {
    /// Pages in tab order.
    pages: Vec<TabPage>,

    /// Active tab index (-1 if none).
    current_index: i32,

    /// Exclusivity over the panels.
    group: ExclusiveGroup,

    /// Signal emitted when the active tab changes.
    pub current_changed: Signal<i32>,
}

impl TabController {
    /// Create an empty tab controller.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current_index: -1,
            group: ExclusiveGroup::new(),
            current_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Tab Management
    // =========================================================================

    /// Append a tab.
    ///
    /// Returns the new tab's index. Fails if the panel is already
    /// registered as a tab here.
    pub fn add_tab(&mut self, trigger: ElementId, panel: ElementId) -> Result<i32> {
        self.group.register(panel)?;
        self.pages.push(TabPage {
            trigger,
            panel,
            enabled: true,
        });
        Ok(self.pages.len() as i32 - 1)
    }

    /// Remove the tab at `index`.
    ///
    /// Returns the removed trigger/panel pair. If the active tab is
    /// removed, no tab is active afterwards; the host decides what to
    /// select next.
    pub fn remove_tab(&mut self, index: i32) -> Option<(ElementId, ElementId)> {
        if index < 0 || index as usize >= self.pages.len() {
            return None;
        }

        let page = self.pages.remove(index as usize);
        self.group.unregister(page.panel);

        let old_current = self.current_index;
        if index == self.current_index {
            self.current_index = -1;
        } else if index < self.current_index {
            self.current_index -= 1;
        }

        if self.current_index != old_current {
            self.current_changed.emit(self.current_index);
        }

        Some((page.trigger, page.panel))
    }

    /// Number of tabs.
    pub fn count(&self) -> i32 {
        self.pages.len() as i32
    }

    /// Check if the controller has no tabs.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get the trigger element at `index`.
    pub fn trigger_at(&self, index: i32) -> Option<ElementId> {
        if index < 0 {
            return None;
        }
        self.pages.get(index as usize).map(|p| p.trigger)
    }

    /// Get the panel element at `index`.
    pub fn panel_at(&self, index: i32) -> Option<ElementId> {
        if index < 0 {
            return None;
        }
        self.pages.get(index as usize).map(|p| p.panel)
    }

    /// Find a tab's index by its panel element. Returns -1 if not found.
    pub fn index_of_panel(&self, panel: ElementId) -> i32 {
        self.pages
            .iter()
            .position(|p| p.panel == panel)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Check if a tab is enabled.
    pub fn is_tab_enabled(&self, index: i32) -> bool {
        index >= 0
            && self
                .pages
                .get(index as usize)
                .is_some_and(|p| p.enabled)
    }

    /// Enable or disable a tab. Disabled tabs are skipped by circular
    /// navigation and refuse direct selection.
    pub fn set_tab_enabled(&mut self, index: i32, enabled: bool) {
        if index < 0 {
            return;
        }
        if let Some(page) = self.pages.get_mut(index as usize) {
            page.enabled = enabled;
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The active tab index, or -1 if none.
    pub fn active_index(&self) -> i32 {
        self.current_index
    }

    /// Select the tab at `index`.
    ///
    /// Shows the panel, hides the previously active one, and moves focus
    /// to the tab's trigger. Returns `false` (rather than failing) for an
    /// out-of-range index, a disabled tab, or a selection that changes
    /// nothing.
    pub fn select_tab<S: RenderSurface>(&mut self, surface: &mut S, index: i32) -> bool {
        if index < 0 || index as usize >= self.pages.len() {
            return false;
        }
        if !self.pages[index as usize].enabled {
            return false;
        }
        if index == self.current_index {
            return false;
        }

        let panel = self.pages[index as usize].panel;
        let trigger = self.pages[index as usize].trigger;

        if let Some(displaced) = self.group.notify_opened(panel) {
            surface.set_visible(displaced, false);
        }
        surface.set_visible(panel, true);
        surface.move_focus(trigger);

        self.current_index = index;
        debug!(target: targets::CONTROLLER, index, "tab selected");
        self.current_changed.emit(index);
        true
    }

    /// Select the next tab, wrapping past the end: `(index + 1) % count`.
    ///
    /// Disabled tabs are skipped. Returns `false` when there is no other
    /// selectable tab.
    pub fn next_tab<S: RenderSurface>(&mut self, surface: &mut S) -> bool {
        match self.find_enabled_index(self.current_index, true) {
            Some(index) => self.select_tab(surface, index),
            None => false,
        }
    }

    /// Select the previous tab, wrapping past the start:
    /// `index - 1`, with 0 wrapping to `count - 1`.
    pub fn previous_tab<S: RenderSurface>(&mut self, surface: &mut S) -> bool {
        match self.find_enabled_index(self.current_index, false) {
            Some(index) => self.select_tab(surface, index),
            None => false,
        }
    }

    /// Find the next enabled index in a direction, wrapping around.
    fn find_enabled_index(&self, from: i32, forward: bool) -> Option<i32> {
        let count = self.pages.len() as i32;
        if count == 0 {
            return None;
        }

        let mut index = from.clamp(-1, count - 1);
        for _ in 0..count {
            index = if forward {
                (index + 1).rem_euclid(count)
            } else {
                (index - 1).rem_euclid(count)
            };

            if self.pages[index as usize].enabled && index != self.current_index {
                return Some(index);
            }
        }

        None
    }

    // =========================================================================
    // Input Handling
    // =========================================================================

    /// Handle a key event routed to the tab strip.
    ///
    /// ArrowRight/ArrowLeft move the selection circularly; Home and End
    /// jump to the first/last enabled tab. Returns `true` when consumed.
    pub fn handle_key<S: RenderSurface>(&mut self, surface: &mut S, event: &KeyEvent) -> bool {
        if self.pages.is_empty() {
            return false;
        }

        match event.key {
            Key::ArrowRight => {
                self.next_tab(surface);
                true
            }
            Key::ArrowLeft => {
                self.previous_tab(surface);
                true
            }
            Key::Home => {
                let first = (0..self.count()).find(|&i| self.is_tab_enabled(i));
                if let Some(index) = first {
                    self.select_tab(surface, index);
                }
                true
            }
            Key::End => {
                let last = (0..self.count()).rev().find(|&i| self.is_tab_enabled(i));
                if let Some(index) = last {
                    self.select_tab(surface, index);
                }
                true
            }
            _ => false,
        }
    }
}

impl Default for TabController {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(TabController: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, ViewportBounds};
    use crate::surface::mock::MockSurface;

    fn setup(count: usize) -> (MockSurface, TabController) {
        let mut surface = MockSurface::new(ViewportBounds::new(800.0, 600.0));
        let mut tabs = TabController::new();
        for i in 0..count {
            let trigger = surface.add_element(Rect::new(i as f32 * 80.0, 0.0, 80.0, 24.0));
            let panel = surface.add_element(Rect::new(0.0, 24.0, 400.0, 300.0));
            tabs.add_tab(trigger, panel).unwrap();
        }
        (surface, tabs)
    }

    #[test]
    fn test_empty_controller() {
        let (mut surface, mut tabs) = setup(0);
        assert_eq!(tabs.active_index(), -1);
        assert!(!tabs.next_tab(&mut surface));
        assert!(!tabs.select_tab(&mut surface, 0));
    }

    #[test]
    fn test_select_shows_and_focuses() {
        let (mut surface, mut tabs) = setup(3);

        assert!(tabs.select_tab(&mut surface, 1));
        assert_eq!(tabs.active_index(), 1);
        assert_eq!(surface.visible_count(tabs.panel_at(1).unwrap()), 1);
        assert_eq!(surface.focus_count(tabs.trigger_at(1).unwrap()), 1);
    }

    #[test]
    fn test_selection_displaces_previous_panel() {
        let (mut surface, mut tabs) = setup(3);

        tabs.select_tab(&mut surface, 0);
        tabs.select_tab(&mut surface, 2);

        assert_eq!(surface.hidden_count(tabs.panel_at(0).unwrap()), 1);
        assert_eq!(surface.visible_count(tabs.panel_at(2).unwrap()), 1);
    }

    #[test]
    fn test_out_of_range_returns_false() {
        let (mut surface, mut tabs) = setup(3);
        assert!(!tabs.select_tab(&mut surface, -1));
        assert!(!tabs.select_tab(&mut surface, 3));
        assert_eq!(tabs.active_index(), -1);
    }

    #[test]
    fn test_reselecting_active_tab_is_noop() {
        let (mut surface, mut tabs) = setup(2);
        tabs.select_tab(&mut surface, 0);

        let before = surface.commands.len();
        assert!(!tabs.select_tab(&mut surface, 0));
        assert_eq!(surface.commands.len(), before);
    }

    #[test]
    fn test_next_wraps_to_first() {
        let (mut surface, mut tabs) = setup(3);
        tabs.select_tab(&mut surface, 2);

        // At the last tab, next wraps to index 0.
        assert!(tabs.next_tab(&mut surface));
        assert_eq!(tabs.active_index(), 0);
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let (mut surface, mut tabs) = setup(3);
        tabs.select_tab(&mut surface, 0);

        assert!(tabs.previous_tab(&mut surface));
        assert_eq!(tabs.active_index(), 2);
    }

    #[test]
    fn test_navigation_skips_disabled() {
        let (mut surface, mut tabs) = setup(3);
        tabs.select_tab(&mut surface, 0);
        tabs.set_tab_enabled(1, false);

        assert!(tabs.next_tab(&mut surface));
        assert_eq!(tabs.active_index(), 2);

        assert!(!tabs.select_tab(&mut surface, 1));
    }

    #[test]
    fn test_single_tab_has_nowhere_to_go() {
        let (mut surface, mut tabs) = setup(1);
        tabs.select_tab(&mut surface, 0);

        assert!(!tabs.next_tab(&mut surface));
        assert!(!tabs.previous_tab(&mut surface));
        assert_eq!(tabs.active_index(), 0);
    }

    #[test]
    fn test_key_handling() {
        let (mut surface, mut tabs) = setup(4);
        tabs.select_tab(&mut surface, 0);
        tabs.set_tab_enabled(3, false);

        assert!(tabs.handle_key(&mut surface, &KeyEvent::plain(Key::ArrowRight)));
        assert_eq!(tabs.active_index(), 1);

        assert!(tabs.handle_key(&mut surface, &KeyEvent::plain(Key::End)));
        assert_eq!(tabs.active_index(), 2);

        assert!(tabs.handle_key(&mut surface, &KeyEvent::plain(Key::Home)));
        assert_eq!(tabs.active_index(), 0);

        assert!(!tabs.handle_key(&mut surface, &KeyEvent::plain(Key::Enter)));
    }

    #[test]
    fn test_duplicate_panel_rejected() {
        let mut surface = MockSurface::new(ViewportBounds::new(800.0, 600.0));
        let trigger_a = surface.add_element(Rect::new(0.0, 0.0, 80.0, 24.0));
        let trigger_b = surface.add_element(Rect::new(80.0, 0.0, 80.0, 24.0));
        let panel = surface.add_element(Rect::new(0.0, 24.0, 400.0, 300.0));

        let mut tabs = TabController::new();
        tabs.add_tab(trigger_a, panel).unwrap();
        assert!(tabs.add_tab(trigger_b, panel).is_err());
    }

    #[test]
    fn test_remove_tab_adjusts_current() {
        let (mut surface, mut tabs) = setup(3);
        tabs.select_tab(&mut surface, 2);

        tabs.remove_tab(0);
        assert_eq!(tabs.active_index(), 1);

        // Removing the active tab leaves nothing selected.
        tabs.remove_tab(1);
        assert_eq!(tabs.active_index(), -1);
        assert_eq!(tabs.count(), 1);
    }

    #[test]
    fn test_exclusivity_invariant_through_navigation() {
        let (mut surface, mut tabs) = setup(4);
        tabs.select_tab(&mut surface, 0);

        for _ in 0..9 {
            tabs.next_tab(&mut surface);
            assert!(tabs.group.open_count() <= 1);
        }
        // 9 wraps from index 0 over 4 tabs land on index 1.
        assert_eq!(tabs.active_index(), 1);
    }
}
