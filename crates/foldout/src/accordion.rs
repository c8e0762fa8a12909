//! Accordion disclosure controller.
//!
//! This module provides [`AccordionController`], which manages an ordered
//! column of header/panel sections. In *exclusive* mode the sections form
//! an exclusivity group: opening one collapses whichever section was open.
//! In *independent* mode the sections are standalone disclosure widgets:
//! each opens and closes freely and several may be open at once.
//!
//! # Example
//!
//! ```ignore
//! use foldout::accordion::AccordionController;
//!
//! let mut accordion = AccordionController::exclusive();
//! accordion.add_section(settings_header, settings_panel)?;
//! accordion.add_section(advanced_header, advanced_panel)?;
//!
//! accordion.section_toggled.connect(|&(panel, open)| {
//!     println!("Section {panel:?} is now {}", if open { "open" } else { "closed" });
//! });
//!
//! accordion.toggle_section(&mut surface, 0);
//! ```

use tracing::debug;

use foldout_core::logging::targets;
use foldout_core::{ElementId, Signal};

use crate::error::{Error, Result};
use crate::events::{Key, KeyEvent};
use crate::group::ExclusiveGroup;
use crate::surface::RenderSurface;

/// One header/panel section.
#[derive(Debug, Clone, Copy)]
struct Section {
    /// The clickable header element.
    header: ElementId,
    /// The collapsible panel element.
    panel: ElementId,
    /// Open state; in exclusive mode this mirrors the group record.
    open: bool,
}

/// Coordinates an ordered set of header/panel disclosure sections.
///
/// Header focus moves with ArrowDown/ArrowUp and wraps around the ends
/// (unlike the dropdown's clamped item cursor); Home/End jump to the
/// first/last header; Enter/Space toggles the focused section.
///
/// # Signals
///
/// - `section_toggled((ElementId, bool))`: emitted for every section
///   open/close, including the one collapsed by exclusivity
pub struct AccordionController {
    /// Sections in display order.
    sections: Vec<Section>,

    /// Exclusivity group; `None` means independent sections.
    group: Option<ExclusiveGroup>,

    /// Focused header index (-1 for none).
    focused_header: i32,

    /// Signal emitted when a section's open state changes.
    pub section_toggled: Signal<(ElementId, bool)>,
}

impl AccordionController {
    /// Create an accordion whose sections open independently.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            group: None,
            focused_header: -1,
            section_toggled: Signal::new(),
        }
    }

    /// Create an accordion with at most one open section.
    pub fn exclusive() -> Self {
        Self {
            group: Some(ExclusiveGroup::new()),
            ..Self::new()
        }
    }

    /// Check if this accordion enforces exclusivity.
    pub fn is_exclusive(&self) -> bool {
        self.group.is_some()
    }

    // =========================================================================
    // Section Management
    // =========================================================================

    /// Append a section. Sections start closed.
    ///
    /// Returns the new section's index. In exclusive mode, fails if the
    /// panel is already registered.
    pub fn add_section(&mut self, header: ElementId, panel: ElementId) -> Result<i32> {
        if let Some(group) = &mut self.group {
            group.register(panel)?;
        } else if self.sections.iter().any(|s| s.panel == panel) {
            return Err(Error::duplicate_member(panel));
        }

        self.sections.push(Section {
            header,
            panel,
            open: false,
        });
        Ok(self.sections.len() as i32 - 1)
    }

    /// Remove the section at `index`.
    ///
    /// If it was open, the record is cleared without issuing a close
    /// command, since the element is going away with its widget.
    pub fn remove_section(&mut self, index: i32) -> Option<(ElementId, ElementId)> {
        if index < 0 || index as usize >= self.sections.len() {
            return None;
        }

        let section = self.sections.remove(index as usize);
        if let Some(group) = &mut self.group {
            group.unregister(section.panel);
        }
        if self.focused_header == index {
            self.focused_header = -1;
        } else if index < self.focused_header {
            self.focused_header -= 1;
        }

        Some((section.header, section.panel))
    }

    /// Number of sections.
    pub fn count(&self) -> i32 {
        self.sections.len() as i32
    }

    /// Check if the accordion has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Get the header element at `index`.
    pub fn header_at(&self, index: i32) -> Option<ElementId> {
        if index < 0 {
            return None;
        }
        self.sections.get(index as usize).map(|s| s.header)
    }

    /// Get the panel element at `index`.
    pub fn panel_at(&self, index: i32) -> Option<ElementId> {
        if index < 0 {
            return None;
        }
        self.sections.get(index as usize).map(|s| s.panel)
    }

    /// Find a section's index by its panel element. Returns -1 if absent.
    pub fn index_of_panel(&self, panel: ElementId) -> i32 {
        self.sections
            .iter()
            .position(|s| s.panel == panel)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    // =========================================================================
    // Open State
    // =========================================================================

    /// Check if the section at `index` is open.
    pub fn is_open(&self, index: i32) -> bool {
        index >= 0
            && self
                .sections
                .get(index as usize)
                .is_some_and(|s| s.open)
    }

    /// The open section's index in exclusive mode, or -1 if none.
    pub fn active_index(&self) -> i32 {
        self.sections
            .iter()
            .position(|s| s.open)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Open the section at `index`.
    ///
    /// In exclusive mode the previously open section collapses through the
    /// coordinator. Returns `false` for an out-of-range index or a section
    /// that is already open.
    pub fn open_section<S: RenderSurface>(&mut self, surface: &mut S, index: i32) -> bool {
        if index < 0 || index as usize >= self.sections.len() {
            return false;
        }
        if self.sections[index as usize].open {
            return false;
        }

        let panel = self.sections[index as usize].panel;

        if let Some(group) = &mut self.group {
            if let Some(displaced) = group.notify_opened(panel) {
                surface.set_visible(displaced, false);
                if let Some(previous) = self.sections.iter_mut().find(|s| s.panel == displaced) {
                    previous.open = false;
                }
                self.section_toggled.emit((displaced, false));
            }
        }

        self.sections[index as usize].open = true;
        surface.set_visible(panel, true);
        debug!(target: targets::CONTROLLER, ?panel, "section opened");
        self.section_toggled.emit((panel, true));
        true
    }

    /// Close the section at `index`.
    ///
    /// Returns `false` for an out-of-range index or a section that is
    /// already closed.
    pub fn close_section<S: RenderSurface>(&mut self, surface: &mut S, index: i32) -> bool {
        if index < 0 || index as usize >= self.sections.len() {
            return false;
        }
        if !self.sections[index as usize].open {
            return false;
        }

        let panel = self.sections[index as usize].panel;
        if let Some(group) = &mut self.group {
            group.notify_closed(panel);
        }
        self.sections[index as usize].open = false;
        surface.set_visible(panel, false);
        debug!(target: targets::CONTROLLER, ?panel, "section closed");
        self.section_toggled.emit((panel, false));
        true
    }

    /// Toggle the section at `index`.
    pub fn toggle_section<S: RenderSurface>(&mut self, surface: &mut S, index: i32) -> bool {
        if self.is_open(index) {
            self.close_section(surface, index)
        } else {
            self.open_section(surface, index)
        }
    }

    /// Count of currently open sections.
    pub fn open_count(&self) -> usize {
        self.sections.iter().filter(|s| s.open).count()
    }

    // =========================================================================
    // Header Focus
    // =========================================================================

    /// The focused header index, or -1 when none.
    pub fn focused_header(&self) -> i32 {
        self.focused_header
    }

    /// Move header focus to `index`.
    pub fn focus_header<S: RenderSurface>(&mut self, surface: &mut S, index: i32) -> bool {
        if index < 0 || index as usize >= self.sections.len() {
            return false;
        }
        self.focused_header = index;
        surface.move_focus(self.sections[index as usize].header);
        true
    }

    /// Handle a key event routed to the accordion.
    ///
    /// ArrowDown/ArrowUp move header focus with wraparound, Home/End jump
    /// to the first/last header, Enter/Space toggles the focused section.
    /// Returns `true` when consumed.
    pub fn handle_key<S: RenderSurface>(&mut self, surface: &mut S, event: &KeyEvent) -> bool {
        if self.sections.is_empty() {
            return false;
        }
        let count = self.sections.len() as i32;

        match event.key {
            Key::ArrowDown => {
                let next = (self.focused_header + 1).rem_euclid(count);
                self.focus_header(surface, next);
                true
            }
            Key::ArrowUp => {
                // From "nothing focused", ArrowUp lands on the last header.
                let previous = if self.focused_header < 0 {
                    count - 1
                } else {
                    (self.focused_header - 1).rem_euclid(count)
                };
                self.focus_header(surface, previous);
                true
            }
            Key::Home => {
                self.focus_header(surface, 0);
                true
            }
            Key::End => {
                self.focus_header(surface, count - 1);
                true
            }
            Key::Enter | Key::Space => {
                if self.focused_header >= 0 {
                    self.toggle_section(surface, self.focused_header);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

impl Default for AccordionController {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(AccordionController: Send, Sync);
