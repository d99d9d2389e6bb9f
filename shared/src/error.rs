//! Unified error taxonomy
//!
//! Every module-level error in the workspace resolves into one of
//! these categories before it reaches the UI boundary. The categories
//! map 1:1 to how the caller recovers:
//!
//! | Category | Recovery |
//! |----------|----------|
//! | Validation | correct the input and resubmit |
//! | Conflict | different input or admin intervention |
//! | Auth | retry with correct credentials |
//! | Geofence | move closer, or admin widens the radius |
//! | Network | retry; local state is never corrupted |
//! | DeviceLock | admin device reset only |
//! | Storage | local persistence failure (I/O or serialization) |

use thiserror::Error;

/// Top-level error category for Geoclock core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input (400-class, recoverable)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Duplicate national id, duplicate or foreign device
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credentials (employee, admin or report account)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Attendance attempted outside the branch radius
    #[error("out of range: {0}")]
    Geofence(String),

    /// Remote pull/push failure; local data untouched
    #[error("network error: {0}")]
    Network(String),

    /// Account is locked to a different device
    #[error("device locked: {0}")]
    DeviceLock(String),

    /// Local store failure (I/O or serialization)
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
