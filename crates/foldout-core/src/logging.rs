//! Logging facilities for Foldout.
//!
//! Foldout uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the embedding application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Application code...
//! }
//! ```
//!
//! State transitions are logged at `trace`/`debug` level under the targets
//! below, so a host can filter one subsystem at a time, e.g.
//! `RUST_LOG=foldout::group=trace`.

/// Span names used throughout Foldout for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Exclusive-group transition span.
    pub const GROUP: &str = "foldout::group";
    /// Overlay placement computation span.
    pub const PLACEMENT: &str = "foldout::placement";
    /// Controller state-machine span.
    pub const CONTROLLER: &str = "foldout::controller";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core systems target.
    pub const CORE: &str = "foldout_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "foldout_core::signal";
    /// Element registry target.
    pub const ELEMENT: &str = "foldout_core::element";
    /// Exclusive-group coordinator target.
    pub const GROUP: &str = "foldout::group";
    /// Overlay placement target.
    pub const PLACEMENT: &str = "foldout::placement";
    /// Disclosure controllers target.
    pub const CONTROLLER: &str = "foldout::controller";
}
