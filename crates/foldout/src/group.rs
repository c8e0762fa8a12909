//! Exclusive-group coordination for disclosure widgets.
//!
//! This module provides [`ExclusiveGroup`], a non-visual coordinator that
//! tracks which single member of a sibling set is open and reports which
//! sibling must collapse when a new one opens.
//!
//! # Example
//!
//! ```
//! use foldout::group::ExclusiveGroup;
//! use foldout_core::ElementRegistry;
//!
//! let mut registry = ElementRegistry::new();
//! let first = registry.insert(None);
//! let second = registry.insert(None);
//!
//! let mut group = ExclusiveGroup::new();
//! group.register(first).unwrap();
//! group.register(second).unwrap();
//!
//! assert_eq!(group.notify_opened(first), None);
//! // Opening the second member displaces the first.
//! assert_eq!(group.notify_opened(second), Some(first));
//! assert_eq!(group.open_member(), Some(second));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use foldout_core::logging::targets;
use foldout_core::{ElementId, Signal};

use crate::error::{Error, Result};

/// Recorded state for one member.
#[derive(Debug, Clone, Copy, Default)]
struct MemberState {
    /// Whether this member is currently recorded open.
    open: bool,
}

/// A non-visual coordinator enforcing at-most-one-open among its members.
///
/// Members are identified by the host element id of their collapsible
/// region. The group never issues rendering commands itself: state
/// transitions go through [`notify_opened`](Self::notify_opened) /
/// [`notify_closed`](Self::notify_closed), and the caller applies the
/// returned displacement through its render surface. Exclusivity lives
/// here, centrally; members never inspect their siblings.
///
/// # Invariant
///
/// After any sequence of register/notify/unregister calls, at most one
/// member is recorded open.
///
/// # Signals
///
/// - `open_changed((ElementId, bool))`: emitted for every recorded
///   open/close transition, including the displaced member's close.
#[derive(Debug)]
pub struct ExclusiveGroup {
    /// Map from member element to its recorded state.
    members: HashMap<ElementId, MemberState>,

    /// The currently open member, if any.
    open_member: Option<ElementId>,

    /// Signal emitted when a member's recorded open state changes.
    pub open_changed: Signal<(ElementId, bool)>,
}

impl ExclusiveGroup {
    /// Create a new empty group.
    pub fn new() -> Self {
        Self {
            members: HashMap::new(),
            open_member: None,
            open_changed: Signal::new(),
        }
    }

    /// Wrap this group for sharing between sibling controllers.
    pub fn into_shared(self) -> SharedExclusiveGroup {
        Arc::new(Mutex::new(self))
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Register a member.
    ///
    /// Fails with [`Error::DuplicateMember`] if the member is already
    /// registered in this group.
    pub fn register(&mut self, member: ElementId) -> Result<()> {
        if self.members.contains_key(&member) {
            return Err(Error::duplicate_member(member));
        }
        self.members.insert(member, MemberState::default());
        trace!(target: targets::GROUP, ?member, "member registered");
        Ok(())
    }

    /// Remove a member from the group.
    ///
    /// If it was the open member, the record is cleared without a close
    /// notification (the member is gone). Returns `false` if the member was
    /// not registered, so unmount paths may run more than once.
    pub fn unregister(&mut self, member: ElementId) -> bool {
        if self.members.remove(&member).is_none() {
            return false;
        }
        if self.open_member == Some(member) {
            self.open_member = None;
        }
        trace!(target: targets::GROUP, ?member, "member unregistered");
        true
    }

    /// Check if a member is registered.
    pub fn contains(&self, member: ElementId) -> bool {
        self.members.contains_key(&member)
    }

    /// All registered members.
    pub fn members(&self) -> Vec<ElementId> {
        self.members.keys().copied().collect()
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // =========================================================================
    // Open State
    // =========================================================================

    /// The currently open member, if any.
    pub fn open_member(&self) -> Option<ElementId> {
        self.open_member
    }

    /// Check if a member is recorded open.
    pub fn is_open(&self, member: ElementId) -> bool {
        self.members.get(&member).is_some_and(|s| s.open)
    }

    /// Record that a member opened. This is the single authoritative
    /// transition point for the group.
    ///
    /// Returns the member that was displaced and must now be collapsed by
    /// the caller, if any. Idempotent when the member is already the open
    /// one: nothing changes and no notifications are re-fired. An
    /// unregistered member is a no-op.
    pub fn notify_opened(&mut self, member: ElementId) -> Option<ElementId> {
        if !self.members.contains_key(&member) {
            return None;
        }
        if self.open_member == Some(member) {
            return None;
        }

        let displaced = self.open_member.take();
        if let Some(previous) = displaced {
            if let Some(state) = self.members.get_mut(&previous) {
                state.open = false;
            }
            trace!(target: targets::GROUP, member = ?previous, "member displaced");
            self.open_changed.emit((previous, false));
        }

        if let Some(state) = self.members.get_mut(&member) {
            state.open = true;
        }
        self.open_member = Some(member);
        trace!(target: targets::GROUP, ?member, "member opened");
        self.open_changed.emit((member, true));

        displaced
    }

    /// Record that a member closed.
    ///
    /// Only the recorded open member clears the record; anything else is a
    /// no-op.
    pub fn notify_closed(&mut self, member: ElementId) {
        if self.open_member != Some(member) {
            return;
        }

        self.open_member = None;
        if let Some(state) = self.members.get_mut(&member) {
            state.open = false;
        }
        trace!(target: targets::GROUP, ?member, "member closed");
        self.open_changed.emit((member, false));
    }

    /// Count of members currently recorded open (0 or 1).
    pub fn open_count(&self) -> usize {
        self.members.values().filter(|s| s.open).count()
    }
}

impl Default for ExclusiveGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// A group shared by sibling controllers.
///
/// Each controller holds a clone of the handle and locks it only for the
/// duration of a single notify call; the engine's event handling is
/// serial, so the lock exists to satisfy `Send + Sync` bounds, not to
/// arbitrate contention.
pub type SharedExclusiveGroup = Arc<Mutex<ExclusiveGroup>>;

static_assertions::assert_impl_all!(ExclusiveGroup: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Helper to mint element ids for testing
    fn make_test_ids(count: usize) -> Vec<ElementId> {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_group_creation() {
        let group = ExclusiveGroup::new();
        assert!(group.is_empty());
        assert_eq!(group.open_member(), None);
        assert_eq!(group.open_count(), 0);
    }

    #[test]
    fn test_register_and_duplicate() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();

        group.register(ids[0]).unwrap();
        group.register(ids[1]).unwrap();
        assert_eq!(group.len(), 2);

        let err = group.register(ids[0]).unwrap_err();
        assert!(matches!(err, Error::DuplicateMember { member } if member == ids[0]));
    }

    #[test]
    fn test_open_displaces_previous_member() {
        let ids = make_test_ids(3);
        let mut group = ExclusiveGroup::new();
        for &id in &ids {
            group.register(id).unwrap();
        }

        // First open has nothing to displace.
        assert_eq!(group.notify_opened(ids[1]), None);
        assert_eq!(group.open_member(), Some(ids[1]));

        // Second open displaces the first exactly once.
        assert_eq!(group.notify_opened(ids[2]), Some(ids[1]));
        assert_eq!(group.open_member(), Some(ids[2]));
        assert!(!group.is_open(ids[1]));
        assert!(group.is_open(ids[2]));
    }

    #[test]
    fn test_open_is_idempotent() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();
        group.register(ids[0]).unwrap();
        group.register(ids[1]).unwrap();

        let emissions = std::sync::Arc::new(AtomicUsize::new(0));
        let emissions_clone = emissions.clone();
        group.open_changed.connect(move |_| {
            emissions_clone.fetch_add(1, Ordering::SeqCst);
        });

        group.notify_opened(ids[0]);
        assert_eq!(emissions.load(Ordering::SeqCst), 1);

        // Re-opening the open member fires nothing and displaces nobody.
        assert_eq!(group.notify_opened(ids[0]), None);
        assert_eq!(emissions.load(Ordering::SeqCst), 1);
        assert_eq!(group.open_member(), Some(ids[0]));
    }

    #[test]
    fn test_notify_closed() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();
        group.register(ids[0]).unwrap();
        group.register(ids[1]).unwrap();

        group.notify_opened(ids[0]);
        // Closing a member that is not the open one is a no-op.
        group.notify_closed(ids[1]);
        assert_eq!(group.open_member(), Some(ids[0]));

        group.notify_closed(ids[0]);
        assert_eq!(group.open_member(), None);
        assert!(!group.is_open(ids[0]));
    }

    #[test]
    fn test_unregister_open_member_clears_record() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();
        group.register(ids[0]).unwrap();
        group.register(ids[1]).unwrap();

        let emissions = std::sync::Arc::new(AtomicUsize::new(0));
        let emissions_clone = emissions.clone();
        group.open_changed.connect(move |_| {
            emissions_clone.fetch_add(1, Ordering::SeqCst);
        });

        group.notify_opened(ids[0]);
        assert!(group.unregister(ids[0]));

        // Record cleared without a close notification.
        assert_eq!(group.open_member(), None);
        assert_eq!(emissions.load(Ordering::SeqCst), 1);
        assert!(!group.unregister(ids[0]));
    }

    #[test]
    fn test_unregistered_member_is_ignored() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();
        group.register(ids[0]).unwrap();

        assert_eq!(group.notify_opened(ids[1]), None);
        assert_eq!(group.open_member(), None);
    }

    #[test]
    fn test_exclusivity_invariant_over_sequences() {
        let ids = make_test_ids(4);
        let mut group = ExclusiveGroup::new();
        for &id in &ids {
            group.register(id).unwrap();
        }

        let script: &[(usize, bool)] = &[
            (0, true),
            (1, true),
            (1, true),
            (2, true),
            (2, false),
            (3, true),
            (0, true),
            (0, false),
        ];

        for &(idx, open) in script {
            if open {
                group.notify_opened(ids[idx]);
            } else {
                group.notify_closed(ids[idx]);
            }
            assert!(group.open_count() <= 1);
        }
    }

    #[test]
    fn test_shared_handle() {
        let ids = make_test_ids(2);
        let mut group = ExclusiveGroup::new();
        group.register(ids[0]).unwrap();
        group.register(ids[1]).unwrap();

        let shared = group.into_shared();
        let other = shared.clone();

        shared.lock().notify_opened(ids[0]);
        assert_eq!(other.lock().notify_opened(ids[1]), Some(ids[0]));
    }
}
