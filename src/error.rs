//! Error types for Apollonius triangulation and contact construction.

use std::fmt;

/// Errors the public API can return.
///
/// Geometric degeneracies, contour pairing anomalies, and out-of-range
/// input indices are all handled silently inside the core (see the crate's
/// design notes); they never surface as an `ApollotaError`.
#[derive(Debug, Clone)]
pub enum ApollotaError {
    /// A configuration builder rejected a parameter.
    InvalidConfig(String),
    /// The triangulator could not seed a first face from any starting
    /// anchor; fatal, since no quadruples can be produced at all.
    UnseedableTriangulation { anchor: usize },
    /// A returned result failed one of the invariants in `validate`.
    InvariantViolation(String),
}

impl fmt::Display for ApollotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApollotaError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            ApollotaError::UnseedableTriangulation { anchor } => {
                write!(f, "could not seed triangulation from anchor {}", anchor)
            }
            ApollotaError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for ApollotaError {}

/// Result type alias for Apollonius operations.
pub type Result<T> = std::result::Result<T, ApollotaError>;
