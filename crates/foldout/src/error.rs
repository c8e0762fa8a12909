//! Error types for the disclosure engine.

use foldout_core::ElementId;

/// Result type alias for disclosure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the disclosure engine.
///
/// Only construction-time configuration problems and programmer errors are
/// reported as errors. Runtime anomalies (an element disappearing from the
/// surface, an empty item list, navigation with nothing focused) degrade to
/// no-ops, and index-based navigation reports failure through its `bool`
/// return value instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required collaborator element was missing at construction time.
    #[error("required {role} element is not present on the render surface")]
    MissingElement { role: &'static str },

    /// The same member was registered twice in one exclusivity group.
    #[error("member {member:?} is already registered in this group")]
    DuplicateMember { member: ElementId },
}

impl Error {
    /// Create a missing-element configuration error.
    pub fn missing_element(role: &'static str) -> Self {
        Self::MissingElement { role }
    }

    /// Create a duplicate-member error.
    pub fn duplicate_member(member: ElementId) -> Self {
        Self::DuplicateMember { member }
    }
}
