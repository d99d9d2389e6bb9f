//! Admin registry operations
//!
//! Thin mutations over [`AppState`]: each one validates, applies and
//! persists the touched collection. Nothing here talks to the
//! network; pushing the result to the endpoint is the separate,
//! explicit `updateSystem` bulk save on the sync coordinator.

use shared::{CoreError, CoreResult};
use shared::models::{
    Branch, BranchCreate, BranchUpdate, Job, ReportAccount, User, UserUpdate,
};
use shared::util::entity_id;

use crate::state::AppState;

fn validate_radius(radius_meters: f64) -> CoreResult<()> {
    if !(radius_meters > 0.0) {
        return Err(CoreError::validation("branch radius must be positive"));
    }
    Ok(())
}

// ── Branches ────────────────────────────────────────────────────────

pub fn add_branch(state: &AppState, data: BranchCreate) -> CoreResult<Branch> {
    if data.name.trim().is_empty() {
        return Err(CoreError::validation("branch name must not be empty"));
    }
    validate_radius(data.radius_meters)?;

    let branch = Branch {
        id: entity_id(),
        name: data.name,
        latitude: data.latitude,
        longitude: data.longitude,
        radius_meters: data.radius_meters,
    };
    state.update_branches(|branches| branches.push(branch.clone()))?;
    Ok(branch)
}

pub fn update_branch(state: &AppState, id: &str, data: BranchUpdate) -> CoreResult<Branch> {
    if let Some(radius) = data.radius_meters {
        validate_radius(radius)?;
    }
    let mut updated = None;
    state.update_branches(|branches| {
        if let Some(branch) = branches.iter_mut().find(|b| b.id == id) {
            if let Some(name) = data.name {
                branch.name = name;
            }
            if let Some(latitude) = data.latitude {
                branch.latitude = latitude;
            }
            if let Some(longitude) = data.longitude {
                branch.longitude = longitude;
            }
            if let Some(radius) = data.radius_meters {
                branch.radius_meters = radius;
            }
            updated = Some(branch.clone());
        }
    })?;
    updated.ok_or_else(|| CoreError::validation("branch not found"))
}

pub fn delete_branch(state: &AppState, id: &str) -> CoreResult<()> {
    state.update_branches(|branches| branches.retain(|b| b.id != id))?;
    Ok(())
}

// ── Jobs ────────────────────────────────────────────────────────────

pub fn add_job(state: &AppState, title: impl Into<String>) -> CoreResult<Job> {
    let title = title.into();
    if title.trim().is_empty() {
        return Err(CoreError::validation("job title must not be empty"));
    }
    let job = Job {
        id: entity_id(),
        title,
    };
    state.update_jobs(|jobs| jobs.push(job.clone()))?;
    Ok(job)
}

/// Deleting a job does not touch users still carrying its title;
/// they keep the stale string until an admin re-edits them.
pub fn delete_job(state: &AppState, id: &str) -> CoreResult<()> {
    state.update_jobs(|jobs| jobs.retain(|j| j.id != id))?;
    Ok(())
}

// ── Users ───────────────────────────────────────────────────────────

pub fn update_user(state: &AppState, id: &str, data: UserUpdate) -> CoreResult<User> {
    let mut updated = None;
    state.update_users(|users| {
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(full_name) = data.full_name {
                user.full_name = full_name;
            }
            if let Some(national_id) = data.national_id {
                user.national_id = national_id;
            }
            if let Some(job_title) = data.job_title {
                user.job_title = Some(job_title);
            }
            if let Some(branch_id) = data.default_branch_id {
                user.default_branch_id = Some(branch_id);
            }
            if let Some(check_in) = data.check_in_time {
                user.check_in_time = Some(check_in);
            }
            if let Some(check_out) = data.check_out_time {
                user.check_out_time = Some(check_out);
            }
            updated = Some(user.clone());
        }
    })?;
    updated.ok_or_else(|| CoreError::validation("user not found"))
}

pub fn delete_user(state: &AppState, id: &str) -> CoreResult<()> {
    state.update_users(|users| users.retain(|u| u.id != id))?;
    Ok(())
}

/// Clear a user's device binding so their next login re-binds to
/// whatever device they use (`RegisteredBound → RegisteredUnbound`).
pub fn reset_device(state: &AppState, id: &str) -> CoreResult<User> {
    let mut updated = None;
    state.update_users(|users| {
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.device_id = None;
            updated = Some(user.clone());
        }
    })?;
    let user = updated.ok_or_else(|| CoreError::validation("user not found"))?;
    tracing::info!(national_id = %user.national_id, "Device binding reset");
    Ok(user)
}

// ── Report accounts ─────────────────────────────────────────────────

pub fn add_report_account(
    state: &AppState,
    username: impl Into<String>,
    password: impl Into<String>,
    allowed_jobs: Vec<String>,
) -> CoreResult<ReportAccount> {
    let username = username.into();
    if username.trim().is_empty() {
        return Err(CoreError::validation("report account username must not be empty"));
    }
    let account = ReportAccount {
        id: entity_id(),
        username,
        password: Some(password.into()),
        allowed_jobs,
    };
    state.update_report_accounts(|accounts| accounts.push(account.clone()))?;
    Ok(account)
}

/// Replace a viewer's password and/or job scope.
pub fn update_report_account(
    state: &AppState,
    id: &str,
    password: Option<String>,
    allowed_jobs: Option<Vec<String>>,
) -> CoreResult<ReportAccount> {
    let mut updated = None;
    state.update_report_accounts(|accounts| {
        if let Some(account) = accounts.iter_mut().find(|a| a.id == id) {
            if let Some(password) = password {
                account.password = Some(password);
            }
            if let Some(jobs) = allowed_jobs {
                account.allowed_jobs = jobs;
            }
            updated = Some(account.clone());
        }
    })?;
    updated.ok_or_else(|| CoreError::validation("report account not found"))
}

pub fn delete_report_account(state: &AppState, id: &str) -> CoreResult<()> {
    state.update_report_accounts(|accounts| accounts.retain(|a| a.id != id))?;
    Ok(())
}

// ── Settings ────────────────────────────────────────────────────────

/// Admin settings form payload.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub sync_url: Option<String>,
    pub google_sheet_link: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

pub fn save_settings(state: &AppState, data: SettingsUpdate) -> CoreResult<()> {
    state.update_config(|config| {
        if let Some(url) = data.sync_url {
            config.sync_url = url;
        }
        if let Some(link) = data.google_sheet_link {
            config.google_sheet_link = link;
        }
        if let Some(username) = data.admin_username {
            config.admin_username = username;
        }
        if let Some(password) = data.admin_password {
            config.admin_password = Some(password);
        }
    })?;
    tracing::info!("Settings saved");
    Ok(())
}
