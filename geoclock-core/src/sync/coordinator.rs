//! Sync coordinator
//!
//! Pull-on-load and manual refresh, admin bulk push, report fetch.
//! Reads are read-modify-replace: every successful pull wholesale-
//! replaces the mirrored collections, no merge, no version check.
//! A pull that loses the race to a local edit silently clobbers it
//! (last write wins, as the endpoint itself behaves).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::cloud::{ReportRow, UpdateSystemRequest};
use shared::util::now_iso;

use crate::state::AppState;

use super::{RemoteApi, SyncError};

/// Coordinates the local mirror against the remote endpoint.
pub struct SyncCoordinator {
    state: AppState,
    remote: Arc<dyn RemoteApi>,
    /// Advisory busy flag for the UI; nothing is enforced with it
    is_syncing: AtomicBool,
    /// Set by a failed pull, cleared by the next successful one
    sync_error: AtomicBool,
}

impl SyncCoordinator {
    pub fn new(state: AppState, remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            state,
            remote,
            is_syncing: AtomicBool::new(false),
            sync_error: AtomicBool::new(false),
        }
    }

    /// Whether a pull is currently in flight. Advisory only: a second
    /// pull started while this is `true` is not prevented.
    pub fn is_syncing(&self) -> bool {
        self.is_syncing.load(Ordering::Relaxed)
    }

    /// Staleness indicator for the UI.
    pub fn sync_error(&self) -> bool {
        self.sync_error.load(Ordering::Relaxed)
    }

    /// Pull the full registry snapshot and replace the local mirrors.
    ///
    /// Never propagates a network failure: a failed pull sets the
    /// sync-error flag and leaves every local collection untouched
    /// (stale-but-available beats failing closed). Local persistence
    /// failures do surface, since they mean the mirror itself broke.
    pub async fn pull(&self) -> Result<(), SyncError> {
        if !self.state.config().is_connected() {
            tracing::debug!("Pull skipped: no endpoint configured");
            return Ok(());
        }

        self.is_syncing.store(true, Ordering::Relaxed);
        let result = self.remote.fetch_snapshot().await;
        self.is_syncing.store(false, Ordering::Relaxed);

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Cloud pull failed");
                self.sync_error.store(true, Ordering::Relaxed);
                return Ok(());
            }
        };

        self.state.replace_branches(snapshot.branches)?;
        self.state.replace_jobs(snapshot.jobs)?;
        if let Some(users) = snapshot.users {
            self.state.replace_users(users)?;
        }
        if let Some(accounts) = snapshot.report_accounts {
            self.state.replace_report_accounts(accounts)?;
        }
        self.state
            .update_config(|config| config.last_updated = Some(now_iso()))?;
        self.sync_error.store(false, Ordering::Relaxed);

        tracing::info!("Cloud pull complete");
        Ok(())
    }

    /// Push every registry plus the admin credentials as one bulk
    /// upsert. Unlike the optimistic outbox writes this is a
    /// user-initiated save, so failures surface to the caller.
    pub async fn push_system(&self) -> Result<(), SyncError> {
        let config = self.state.config();
        if !config.is_connected() {
            return Err(SyncError::Unconfigured);
        }

        let req = UpdateSystemRequest::new(
            self.state.branches(),
            self.state.jobs(),
            self.state.users(),
            self.state.report_accounts(),
            &config,
        );
        self.remote.push_system(&req).await?;
        tracing::info!("System push complete");
        Ok(())
    }

    /// Report viewer login + fetch; scoping happens server-side.
    pub async fn fetch_report_rows(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<ReportRow>, SyncError> {
        if !self.state.config().is_connected() {
            return Err(SyncError::Unconfigured);
        }
        self.remote.fetch_report_rows(username, password).await
    }
}
