//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutomationError`] via `From` when crossing a port boundary.

/// Top-level error for everything that can go wrong inside a poll tick
/// or while wiring the automation together.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    /// The host could not produce a snapshot of the UI tree.
    #[error("host error")]
    Host(#[from] HostError),

    /// A profile or configuration value violates a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A persistence adapter failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failures reported by the host tree primitives.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host service is not bound and serves no requests.
    #[error("host disconnected")]
    Disconnected,
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field was empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// A list that needs at least one entry was empty.
    #[error("{field} must contain at least one entry")]
    EmptyList { field: &'static str },

    /// A duration or interval that must be positive was zero.
    #[error("{field} must be non-zero")]
    ZeroDuration { field: &'static str },
}
