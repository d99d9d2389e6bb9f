//! Application state
//!
//! One cheap-clone handle holding every locally mirrored collection
//! plus the config and the current session. There are no process
//! globals: whoever needs state gets a clone of `AppState` injected.
//!
//! The `RwLock`s exist for interior mutability, not coordination:
//! core logic is event-driven and never holds a guard across an
//! await, so whichever async callback completes last wins (the
//! documented last-write-wins model).

use std::sync::{Arc, RwLock};

use shared::models::{AppConfig, AttendanceRecord, Branch, Job, ReportAccount, User};

use crate::store::{LocalStore, StoreError, StoreKey};

#[derive(Debug)]
struct Inner {
    branches: RwLock<Vec<Branch>>,
    jobs: RwLock<Vec<Job>>,
    users: RwLock<Vec<User>>,
    records: RwLock<Vec<AttendanceRecord>>,
    report_accounts: RwLock<Vec<ReportAccount>>,
    config: RwLock<AppConfig>,
    session: RwLock<Option<User>>,
}

/// Shared application state handle.
#[derive(Debug, Clone)]
pub struct AppState {
    store: LocalStore,
    inner: Arc<Inner>,
}

impl AppState {
    /// Load every persisted key from the store; missing keys start at
    /// their defaults.
    pub fn load(store: LocalStore) -> Result<Self, StoreError> {
        let inner = Inner {
            branches: RwLock::new(store.load_or_default(StoreKey::Branches)?),
            jobs: RwLock::new(store.load_or_default(StoreKey::Jobs)?),
            users: RwLock::new(store.load_or_default(StoreKey::Users)?),
            records: RwLock::new(store.load_or_default(StoreKey::Records)?),
            report_accounts: RwLock::new(store.load_or_default(StoreKey::ReportAccounts)?),
            config: RwLock::new(store.load_or_default(StoreKey::Config)?),
            session: RwLock::new(store.load(StoreKey::Session)?),
        };
        Ok(Self {
            store,
            inner: Arc::new(inner),
        })
    }

    /// The backing store (device identity shares it).
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    // ── Read access (snapshots, guards never escape) ────────────────

    pub fn branches(&self) -> Vec<Branch> {
        self.inner.branches.read().expect("lock poisoned").clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.inner.jobs.read().expect("lock poisoned").clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.inner.users.read().expect("lock poisoned").clone()
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.inner.records.read().expect("lock poisoned").clone()
    }

    pub fn report_accounts(&self) -> Vec<ReportAccount> {
        self.inner
            .report_accounts
            .read()
            .expect("lock poisoned")
            .clone()
    }

    pub fn config(&self) -> AppConfig {
        self.inner.config.read().expect("lock poisoned").clone()
    }

    pub fn session(&self) -> Option<User> {
        self.inner.session.read().expect("lock poisoned").clone()
    }

    pub fn find_branch(&self, id: &str) -> Option<Branch> {
        self.inner
            .branches
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    pub fn find_user_by_national_id(&self, national_id: &str) -> Option<User> {
        self.inner
            .users
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|u| u.national_id == national_id)
            .cloned()
    }

    /// The user (if any) whose bound device is `token`.
    pub fn find_user_by_device(&self, token: &str) -> Option<User> {
        self.inner
            .users
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|u| u.device_id.as_deref() == Some(token))
            .cloned()
    }

    // ── Replacement (pull path: wholesale, last write wins) ─────────

    pub fn replace_branches(&self, branches: Vec<Branch>) -> Result<(), StoreError> {
        *self.inner.branches.write().expect("lock poisoned") = branches;
        self.store
            .save(StoreKey::Branches, &*self.inner.branches.read().expect("lock poisoned"))
    }

    pub fn replace_jobs(&self, jobs: Vec<Job>) -> Result<(), StoreError> {
        *self.inner.jobs.write().expect("lock poisoned") = jobs;
        self.store
            .save(StoreKey::Jobs, &*self.inner.jobs.read().expect("lock poisoned"))
    }

    pub fn replace_users(&self, users: Vec<User>) -> Result<(), StoreError> {
        *self.inner.users.write().expect("lock poisoned") = users;
        self.store
            .save(StoreKey::Users, &*self.inner.users.read().expect("lock poisoned"))
    }

    pub fn replace_report_accounts(&self, accounts: Vec<ReportAccount>) -> Result<(), StoreError> {
        *self.inner.report_accounts.write().expect("lock poisoned") = accounts;
        self.store.save(
            StoreKey::ReportAccounts,
            &*self.inner.report_accounts.read().expect("lock poisoned"),
        )
    }

    // ── Targeted mutation (admin edits, registration, binding) ──────

    /// Run `mutate` over the branch list and persist the result.
    pub fn update_branches(
        &self,
        mutate: impl FnOnce(&mut Vec<Branch>),
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.branches.write().expect("lock poisoned");
        mutate(&mut guard);
        self.store.save(StoreKey::Branches, &*guard)
    }

    pub fn update_jobs(&self, mutate: impl FnOnce(&mut Vec<Job>)) -> Result<(), StoreError> {
        let mut guard = self.inner.jobs.write().expect("lock poisoned");
        mutate(&mut guard);
        self.store.save(StoreKey::Jobs, &*guard)
    }

    pub fn update_users(&self, mutate: impl FnOnce(&mut Vec<User>)) -> Result<(), StoreError> {
        let mut guard = self.inner.users.write().expect("lock poisoned");
        mutate(&mut guard);
        self.store.save(StoreKey::Users, &*guard)
    }

    pub fn update_report_accounts(
        &self,
        mutate: impl FnOnce(&mut Vec<ReportAccount>),
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.report_accounts.write().expect("lock poisoned");
        mutate(&mut guard);
        self.store.save(StoreKey::ReportAccounts, &*guard)
    }

    /// Append one attendance record. Records are append-only; nothing
    /// else in the system touches this list.
    pub fn append_record(&self, record: AttendanceRecord) -> Result<(), StoreError> {
        let mut guard = self.inner.records.write().expect("lock poisoned");
        guard.push(record);
        self.store.save(StoreKey::Records, &*guard)
    }

    pub fn set_config(&self, config: AppConfig) -> Result<(), StoreError> {
        *self.inner.config.write().expect("lock poisoned") = config;
        self.store
            .save(StoreKey::Config, &*self.inner.config.read().expect("lock poisoned"))
    }

    /// Run `mutate` over the config and persist the result.
    pub fn update_config(&self, mutate: impl FnOnce(&mut AppConfig)) -> Result<(), StoreError> {
        let mut guard = self.inner.config.write().expect("lock poisoned");
        mutate(&mut guard);
        self.store.save(StoreKey::Config, &*guard)
    }

    pub fn set_session(&self, user: Option<User>) -> Result<(), StoreError> {
        *self.inner.session.write().expect("lock poisoned") = user.clone();
        match user {
            Some(u) => self.store.save(StoreKey::Session, &u),
            None => self.store.remove(StoreKey::Session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn user(national_id: &str, device: Option<&str>) -> User {
        User {
            id: shared::util::entity_id(),
            full_name: "Test".into(),
            national_id: national_id.into(),
            password: Some("secret1".into()),
            role: Role::Employee,
            device_id: device.map(Into::into),
            job_title: Some("Engineer".into()),
            default_branch_id: None,
            registration_date: None,
            check_in_time: None,
            check_out_time: None,
        }
    }

    #[test]
    fn state_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let state = AppState::load(LocalStore::open(dir.path()).unwrap()).unwrap();
            state
                .update_users(|users| users.push(user("12345678901234", None)))
                .unwrap();
        }
        let state = AppState::load(LocalStore::open(dir.path()).unwrap()).unwrap();
        assert!(state.find_user_by_national_id("12345678901234").is_some());
    }

    #[test]
    fn device_lookup_matches_bound_token_only() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::load(LocalStore::open(dir.path()).unwrap()).unwrap();
        state
            .update_users(|users| {
                users.push(user("11111111111111", Some("dev_a")));
                users.push(user("22222222222222", None));
            })
            .unwrap();
        assert_eq!(
            state.find_user_by_device("dev_a").map(|u| u.national_id),
            Some("11111111111111".to_string())
        );
        assert!(state.find_user_by_device("dev_b").is_none());
    }
}
