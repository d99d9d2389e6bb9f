//! Local durable store
//!
//! Per-key JSON files under a data directory, one file per persisted
//! collection. Each key is loaded independently at startup and
//! written back on every mutation; a missing file simply means the
//! key has never been written.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use shared::CoreError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        CoreError::Storage(e.to_string())
    }
}

/// The durable keys the application persists.
///
/// One file per key; keys never share a file so a corrupt write to
/// one collection cannot take down the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Current logged-in user session
    Session,
    /// Branch registry mirror
    Branches,
    /// Job registry mirror
    Jobs,
    /// Attendance record list (append-only)
    Records,
    /// Full user registry mirror
    Users,
    /// Report viewer accounts
    ReportAccounts,
    /// AppConfig singleton
    Config,
    /// Device-storage token
    DeviceToken,
    /// Pending remote writes
    Outbox,
}

impl StoreKey {
    fn file_name(self) -> &'static str {
        match self {
            StoreKey::Session => "session.json",
            StoreKey::Branches => "branches.json",
            StoreKey::Jobs => "jobs.json",
            StoreKey::Records => "records.json",
            StoreKey::Users => "users.json",
            StoreKey::ReportAccounts => "report_accounts.json",
            StoreKey::Config => "config.json",
            StoreKey::DeviceToken => "device_token.json",
            StoreKey::Outbox => "outbox.json",
        }
    }
}

/// JSON file store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open (and create if needed) a store at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Load a key, `None` if it has never been written.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Result<Option<T>, StoreError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Load a key, falling back to the type's default when absent.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: StoreKey,
    ) -> Result<T, StoreError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Write a key back to disk.
    pub fn save<T: Serialize>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path(key), content)?;
        Ok(())
    }

    /// Delete a key (logout clears the session this way).
    pub fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        let path = self.path(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}
