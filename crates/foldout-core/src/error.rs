//! Error types for Foldout core systems.

use std::fmt;

/// The main error type for Foldout core operations.
#[derive(Debug)]
pub enum CoreError {
    /// Element-related error.
    Element(ElementError),
    /// Signal-related error.
    Signal(SignalError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(err) => write!(f, "Element error: {err}"),
            Self::Signal(err) => write!(f, "Signal error: {err}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Element(err) => Some(err),
            Self::Signal(err) => Some(err),
        }
    }
}

/// Element-registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    /// The element id is not (or no longer) present in the registry.
    UnknownElement,
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement => write!(f, "Unknown or removed element id"),
        }
    }
}

impl std::error::Error for ElementError {}

impl From<ElementError> for CoreError {
    fn from(err: ElementError) -> Self {
        Self::Element(err)
    }
}

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The connection id is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection id"),
        }
    }
}

impl std::error::Error for SignalError {}

impl From<SignalError> for CoreError {
    fn from(err: SignalError) -> Self {
        Self::Signal(err)
    }
}

/// A specialized Result type for Foldout core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
