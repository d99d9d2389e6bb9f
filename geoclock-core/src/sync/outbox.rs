//! Outbox — durable queue for optimistic remote writes
//!
//! Local commits are immediate; the matching remote write
//! (`registerUser`, `updateUserDevice`, `saveAttendance`) becomes a
//! durable entry here and a background worker drains it with bounded
//! retries. An entry that exhausts its retries stays queued with the
//! failure recorded and is picked up again on the next drain trigger;
//! nothing ever rolls back the local commit that spawned it.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use shared::cloud::OutboxAction;
use shared::util::{entity_id, now_iso};

use crate::store::{LocalStore, StoreError, StoreKey};

use super::RemoteApi;

/// Retry attempts per entry within one drain pass
const MAX_RETRIES: u32 = 3;
/// Initial retry delay, doubled per attempt
const INITIAL_RETRY_DELAY_SECS: u64 = 5;
/// Periodic drain interval (catches entries left over from failed passes)
const DRAIN_INTERVAL_SECS: u64 = 300;

/// One queued write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    pub id: String,
    pub action: OutboxAction,
    pub enqueued_at: String,
    /// Total failed push attempts so far (across drain passes)
    #[serde(default)]
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Durable write-behind queue, shared between producers (engine,
/// resolver) and the worker.
#[derive(Clone)]
pub struct Outbox {
    store: LocalStore,
    entries: Arc<Mutex<Vec<OutboxEntry>>>,
    notify: Arc<Notify>,
}

impl Outbox {
    /// Load pending entries left over from a previous run.
    pub fn load(store: LocalStore) -> Result<Self, StoreError> {
        let entries: Vec<OutboxEntry> = store.load_or_default(StoreKey::Outbox)?;
        if !entries.is_empty() {
            tracing::info!(pending = entries.len(), "Outbox loaded with pending writes");
        }
        Ok(Self {
            store,
            entries: Arc::new(Mutex::new(entries)),
            notify: Arc::new(Notify::new()),
        })
    }

    /// Queue a write and wake the worker. The caller's local commit
    /// is already durable by the time this is called.
    pub fn enqueue(&self, action: OutboxAction) -> Result<(), StoreError> {
        let entry = OutboxEntry {
            id: entity_id(),
            action,
            enqueued_at: now_iso(),
            attempts: 0,
            last_error: None,
        };
        tracing::debug!(action = entry.action.label(), "Outbox enqueue");
        {
            let mut guard = self.entries.lock().expect("lock poisoned");
            guard.push(entry);
            self.store.save(StoreKey::Outbox, &*guard)?;
        }
        self.notify.notify_one();
        Ok(())
    }

    /// Snapshot of the pending entries.
    pub fn pending(&self) -> Vec<OutboxEntry> {
        self.entries.lock().expect("lock poisoned").clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("lock poisoned").is_empty()
    }

    fn complete(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("lock poisoned");
        guard.retain(|e| e.id != id);
        self.store.save(StoreKey::Outbox, &*guard)
    }

    fn record_failure(&self, id: &str, attempts: u32, error: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("lock poisoned");
        if let Some(entry) = guard.iter_mut().find(|e| e.id == id) {
            entry.attempts += attempts;
            entry.last_error = Some(error.to_string());
        }
        self.store.save(StoreKey::Outbox, &*guard)
    }
}

/// Background worker draining the outbox.
pub struct OutboxWorker {
    outbox: Outbox,
    remote: Arc<dyn RemoteApi>,
    shutdown: CancellationToken,
}

impl OutboxWorker {
    pub fn new(outbox: Outbox, remote: Arc<dyn RemoteApi>, shutdown: CancellationToken) -> Self {
        Self {
            outbox,
            remote,
            shutdown,
        }
    }

    /// Run until cancelled. Drains on enqueue notification and on a
    /// periodic tick; on shutdown, pending entries simply stay on
    /// disk for the next run.
    pub async fn run(self) {
        tracing::info!("OutboxWorker started");
        let mut interval = tokio::time::interval(Duration::from_secs(DRAIN_INTERVAL_SECS));
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("OutboxWorker shutting down");
                    break;
                }
                _ = self.outbox.notify.notified() => {
                    self.drain_once().await;
                }
                _ = interval.tick() => {
                    self.drain_once().await;
                }
            }
        }
    }

    /// One drain pass over the current pending set. Public so tests
    /// and manual-refresh paths can drive the queue deterministically.
    pub async fn drain_once(&self) {
        for entry in self.outbox.pending() {
            match self.push_with_retry(&entry.action).await {
                Ok(()) => {
                    tracing::debug!(action = entry.action.label(), "Outbox entry pushed");
                    if let Err(e) = self.outbox.complete(&entry.id) {
                        tracing::error!(error = %e, "Failed to persist outbox completion");
                    }
                }
                Err(e) => {
                    // The write stays queued; the local commit it
                    // mirrors is already durable and is never undone.
                    tracing::error!(
                        action = entry.action.label(),
                        error = %e,
                        "Outbox push failed after retries"
                    );
                    if let Err(e) = self.outbox.record_failure(&entry.id, MAX_RETRIES, &e.to_string()) {
                        tracing::error!(error = %e, "Failed to persist outbox failure");
                    }
                }
            }
        }
    }

    async fn push_with_retry(&self, action: &OutboxAction) -> Result<(), super::SyncError> {
        let mut delay = Duration::from_secs(INITIAL_RETRY_DELAY_SECS);
        let mut last_err = None;

        for attempt in 1..=MAX_RETRIES {
            match self.remote.push_action(action).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        action = action.label(),
                        attempt,
                        error = %e,
                        "Outbox push attempt failed"
                    );
                    last_err = Some(e);
                    if attempt < MAX_RETRIES {
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or(super::SyncError::Unconfigured))
    }
}
