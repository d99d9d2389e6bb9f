//! Shared test fixtures: an in-memory remote endpoint and a fully
//! wired core environment over a temp directory.
#![allow(dead_code)] // each test binary uses a different subset

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use geoclock_core::{
    AppState, AttendanceService, FixedDeviceIdentity, IdentityResolver, LocalStore, Outbox,
    RemoteApi, SyncCoordinator, SyncError,
};
use shared::cloud::{OutboxAction, RegistrySnapshot, ReportRow, UpdateSystemRequest};

/// Scripted in-memory endpoint.
#[derive(Default)]
pub struct MockRemote {
    pub online: AtomicBool,
    pub fail_pull: AtomicBool,
    pub fail_push: AtomicBool,
    /// When set, `fetch_snapshot` parks until `release_pull` fires
    pub hold_pull: AtomicBool,
    pull_gate: Notify,
    pub snapshot: Mutex<RegistrySnapshot>,
    pub pushed_actions: Mutex<Vec<OutboxAction>>,
    pub system_pushes: Mutex<Vec<UpdateSystemRequest>>,
}

impl MockRemote {
    pub fn online() -> Arc<Self> {
        let remote = Self::default();
        remote.online.store(true, Ordering::Relaxed);
        Arc::new(remote)
    }

    pub fn set_snapshot(&self, snapshot: RegistrySnapshot) {
        *self.snapshot.lock().unwrap() = snapshot;
    }

    pub fn release_pull(&self) {
        self.pull_gate.notify_one();
    }

    pub fn pushed_labels(&self) -> Vec<&'static str> {
        self.pushed_actions
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.label())
            .collect()
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn fetch_snapshot(&self) -> Result<RegistrySnapshot, SyncError> {
        if self.hold_pull.load(Ordering::Relaxed) {
            self.pull_gate.notified().await;
        }
        if self.fail_pull.load(Ordering::Relaxed) {
            return Err(SyncError::InvalidResponse("endpoint unreachable".into()));
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn push_system(&self, req: &UpdateSystemRequest) -> Result<(), SyncError> {
        if self.fail_push.load(Ordering::Relaxed) {
            return Err(SyncError::InvalidResponse("endpoint unreachable".into()));
        }
        self.system_pushes.lock().unwrap().push(req.clone());
        Ok(())
    }

    async fn push_action(&self, action: &OutboxAction) -> Result<(), SyncError> {
        if self.fail_push.load(Ordering::Relaxed) {
            return Err(SyncError::InvalidResponse("endpoint unreachable".into()));
        }
        self.pushed_actions.lock().unwrap().push(action.clone());
        Ok(())
    }

    async fn fetch_report_rows(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Vec<ReportRow>, SyncError> {
        Ok(Vec::new())
    }

    async fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }
}

/// A wired core over a temp data directory and a mock remote.
pub struct TestEnv {
    pub _dir: tempfile::TempDir,
    pub state: AppState,
    pub remote: Arc<MockRemote>,
    pub outbox: Outbox,
    pub coordinator: Arc<SyncCoordinator>,
    pub attendance: AttendanceService,
    pub identity: IdentityResolver,
}

/// Route `tracing` output into test stdout (RUST_LOG controlled).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl TestEnv {
    pub fn with_device(token: &str) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let state = AppState::load(store.clone()).unwrap();
        let remote = MockRemote::online();
        let outbox = Outbox::load(store).unwrap();
        let coordinator = Arc::new(SyncCoordinator::new(
            state.clone(),
            remote.clone() as Arc<dyn RemoteApi>,
        ));
        let attendance = AttendanceService::new(state.clone(), outbox.clone());
        let identity = IdentityResolver::new(
            state.clone(),
            Arc::new(FixedDeviceIdentity(token.to_string())),
            remote.clone() as Arc<dyn RemoteApi>,
            outbox.clone(),
        );
        Self {
            _dir: dir,
            state,
            remote,
            outbox,
            coordinator,
            attendance,
            identity,
        }
    }

    pub fn new() -> Self {
        Self::with_device("dev_fixture")
    }
}
