//! Remote sync
//!
//! Everything that talks to the spreadsheet endpoint: the HTTP
//! client behind the [`RemoteApi`] trait seam, the coordinator that
//! pulls registry snapshots and pushes admin bulk saves, and the
//! outbox that drains optimistic writes in the background.

mod client;
mod coordinator;
mod outbox;

pub use client::{HttpRemote, RemoteApi};
pub use coordinator::SyncCoordinator;
pub use outbox::{Outbox, OutboxEntry, OutboxWorker};

use thiserror::Error;

use shared::CoreError;

use crate::store::StoreError;

/// Sync failure surface.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No endpoint configured yet (deep link or settings pending)
    #[error("no sync endpoint configured")]
    Unconfigured,

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body did not match the endpoint contract
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Request/response (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Report viewer credentials rejected by the endpoint
    #[error("report credentials rejected")]
    ReportCredentials,

    /// Persisting pulled data failed locally
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SyncError> for CoreError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::ReportCredentials => CoreError::Auth(e.to_string()),
            SyncError::Store(inner) => inner.into(),
            other => CoreError::Network(other.to_string()),
        }
    }
}

/// Endpoint client configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Endpoint base URL (Apps Script style)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl SyncConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}
