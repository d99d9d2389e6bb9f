//! Identity binding & login resolver
//!
//! Registration, employee login and admin login against the locally
//! mirrored user registry, plus the device-binding state machine:
//!
//! `Unregistered → RegisteredUnbound → RegisteredBound`, with the
//! admin device reset re-opening `RegisteredUnbound`. The binding is
//! enforced on both ends: a device already holding another account
//! cannot register or log into a second one, and a bound account
//! cannot log in from a different device.

use std::sync::Arc;

use thiserror::Error;

use shared::CoreError;
use shared::cloud::OutboxAction;
use shared::models::{Role, User};
use shared::util::{entity_id, now_iso};

use crate::device::DeviceIdentity;
use crate::state::AppState;
use crate::store::StoreError;
use crate::sync::{Outbox, RemoteApi};

/// National ids are exactly this long.
const NATIONAL_ID_LEN: usize = 14;
/// Minimum password length at registration.
const MIN_PASSWORD_LEN: usize = 6;
/// Fixed id of the synthesized admin user (never stored in the registry).
const ADMIN_USER_ID: &str = "admin";

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Login/registration refused while offline: authenticating
    /// against a stale cache could accept credentials an admin
    /// already revoked remotely.
    #[error("no connection; try again when the device is online")]
    Offline,

    /// Required registration fields missing
    #[error("complete all fields and choose a job")]
    Incomplete,

    #[error("national id must be {NATIONAL_ID_LEN} digits")]
    InvalidNationalId,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("this national id is already registered; please log in instead")]
    NationalIdTaken,

    /// Registration from a device that already holds another account
    #[error("another employee is already registered on this device")]
    DeviceAlreadyRegistered,

    /// Deliberately does not distinguish wrong id from wrong password
    #[error("incorrect national id or password")]
    InvalidCredentials,

    /// Login while the live device belongs to a different account
    #[error("this device is bound to another account ({owner})")]
    DeviceConflict { owner: String },

    /// Account locked to the device it first bound; admin reset only
    #[error("this account only works on the device it first registered on")]
    DeviceMismatch,

    #[error("admin credentials incorrect")]
    AdminCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<IdentityError> for CoreError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Offline => CoreError::Network(e.to_string()),
            IdentityError::Incomplete
            | IdentityError::InvalidNationalId
            | IdentityError::WeakPassword => CoreError::Validation(e.to_string()),
            IdentityError::NationalIdTaken
            | IdentityError::DeviceAlreadyRegistered
            | IdentityError::DeviceConflict { .. } => CoreError::Conflict(e.to_string()),
            IdentityError::InvalidCredentials | IdentityError::AdminCredentials => {
                CoreError::Auth(e.to_string())
            }
            IdentityError::DeviceMismatch => CoreError::DeviceLock(e.to_string()),
            IdentityError::Store(inner) => inner.into(),
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub national_id: String,
    pub password: String,
    pub job_title: String,
    pub default_branch_id: Option<String>,
}

/// Resolves registrations and logins against the local user cache.
#[derive(Clone)]
pub struct IdentityResolver {
    state: AppState,
    device: Arc<dyn DeviceIdentity>,
    remote: Arc<dyn RemoteApi>,
    outbox: Outbox,
}

impl IdentityResolver {
    pub fn new(
        state: AppState,
        device: Arc<dyn DeviceIdentity>,
        remote: Arc<dyn RemoteApi>,
        outbox: Outbox,
    ) -> Self {
        Self {
            state,
            device,
            remote,
            outbox,
        }
    }

    /// Register a new employee and bind the live device.
    ///
    /// Validation rules run in a fixed order and the first violation
    /// wins, so an incomplete form is reported before a duplicate
    /// device even when both hold. On success the user is appended to
    /// the local cache, a best-effort registration echo is queued for
    /// the endpoint, and the user is logged in locally regardless of
    /// how that push fares. Local and remote may diverge until the
    /// next successful sync.
    pub async fn register(&self, input: Registration) -> Result<User, IdentityError> {
        if !self.remote.is_online().await {
            return Err(IdentityError::Offline);
        }
        if input.full_name.trim().is_empty()
            || input.national_id.is_empty()
            || input.password.is_empty()
            || input.job_title.is_empty()
        {
            return Err(IdentityError::Incomplete);
        }
        if input.national_id.len() != NATIONAL_ID_LEN {
            return Err(IdentityError::InvalidNationalId);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }
        if self
            .state
            .find_user_by_national_id(&input.national_id)
            .is_some()
        {
            return Err(IdentityError::NationalIdTaken);
        }

        let token = self.device.device_token()?;
        if let Some(other) = self.state.find_user_by_device(&token)
            && other.national_id != input.national_id
        {
            return Err(IdentityError::DeviceAlreadyRegistered);
        }

        let user = User {
            id: entity_id(),
            full_name: input.full_name,
            national_id: input.national_id,
            password: Some(input.password),
            role: Role::Employee,
            device_id: Some(token),
            job_title: Some(input.job_title),
            default_branch_id: input.default_branch_id,
            registration_date: Some(now_iso()),
            check_in_time: None,
            check_out_time: None,
        };

        self.state.update_users(|users| users.push(user.clone()))?;

        if let Err(e) = self.outbox.enqueue(OutboxAction::RegisterUser {
            user: user.clone(),
            timestamp: now_iso(),
        }) {
            tracing::error!(error = %e, "Failed to enqueue registration push");
        }

        self.state.set_session(Some(user.clone()))?;
        tracing::info!(national_id = %user.national_id, "Employee registered and device bound");
        Ok(user)
    }

    /// Employee login, binding the device on first success.
    pub async fn login(&self, national_id: &str, password: &str) -> Result<User, IdentityError> {
        if !self.remote.is_online().await {
            return Err(IdentityError::Offline);
        }

        let mut user = self
            .state
            .users()
            .into_iter()
            .find(|u| u.national_id == national_id && u.password.as_deref() == Some(password))
            .ok_or(IdentityError::InvalidCredentials)?;

        let token = self.device.device_token()?;

        // This device may already belong to someone else entirely.
        if let Some(other) = self.state.find_user_by_device(&token)
            && other.national_id != user.national_id
        {
            tracing::warn!(
                national_id = %user.national_id,
                owner = %other.national_id,
                "Login rejected: device bound to a different account"
            );
            return Err(IdentityError::DeviceConflict {
                owner: other.full_name,
            });
        }

        if !user.is_device_bound() {
            // First login on an unbound account: bind now and
            // propagate best-effort.
            user.device_id = Some(token.clone());
            let national = user.national_id.clone();
            self.state.update_users(|users| {
                if let Some(u) = users.iter_mut().find(|u| u.national_id == national) {
                    u.device_id = Some(token.clone());
                }
            })?;
            if let Err(e) = self.outbox.enqueue(OutboxAction::UpdateUserDevice {
                national_id: user.national_id.clone(),
                device_id: token,
            }) {
                tracing::error!(error = %e, "Failed to enqueue device binding push");
            }
            tracing::info!(national_id = %user.national_id, "Device bound on first login");
        } else if user.device_id.as_deref() != Some(token.as_str()) {
            return Err(IdentityError::DeviceMismatch);
        }

        self.state.set_session(Some(user.clone()))?;
        Ok(user)
    }

    /// Admin login: plaintext equality against the configured
    /// credentials, yielding a synthesized admin user that never
    /// enters the registry.
    pub fn admin_login(&self, username: &str, password: &str) -> Result<User, IdentityError> {
        let config = self.state.config();
        if username != config.admin_username
            || config.admin_password.as_deref() != Some(password)
        {
            return Err(IdentityError::AdminCredentials);
        }

        let admin = User {
            id: ADMIN_USER_ID.to_string(),
            full_name: "Administrator".to_string(),
            national_id: "000".to_string(),
            password: None,
            role: Role::Admin,
            device_id: None,
            job_title: None,
            default_branch_id: None,
            registration_date: None,
            check_in_time: None,
            check_out_time: None,
        };
        self.state.set_session(Some(admin.clone()))?;
        Ok(admin)
    }

    /// Clear the current session.
    pub fn logout(&self) -> Result<(), IdentityError> {
        self.state.set_session(None)?;
        Ok(())
    }
}
