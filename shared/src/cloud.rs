//! Spreadsheet endpoint protocol types
//!
//! Used by the core to pull registry snapshots from the configured
//! endpoint and to push mutations back. The endpoint multiplexes on
//! an `action` field: reads via query string (`?action=getData`,
//! `?action=getReportData`), writes via a JSON body tagged with
//! `action`. Write responses are not parsed (fire-and-forget at the
//! protocol level); only `getReportData` has a meaningful body.

use serde::{Deserialize, Serialize};

use crate::models::{AppConfig, AttendanceRecord, Branch, Job, ReportAccount, User};

/// Registry snapshot returned by `?action=getData`.
///
/// Branches and jobs are always present; users and report accounts
/// only appear in later endpoint revisions, so they deserialize as
/// optional and are merged only when supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_accounts: Option<Vec<ReportAccount>>,
}

/// Body of the `updateSystem` bulk upsert.
///
/// Wholesale-replaces the server-side collections; the server never
/// merges, so the admin push must always carry the full registries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSystemRequest {
    pub branches: Vec<Branch>,
    pub jobs: Vec<Job>,
    pub users: Vec<User>,
    pub report_accounts: Vec<ReportAccount>,
    pub admin_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
}

impl UpdateSystemRequest {
    pub fn new(
        branches: Vec<Branch>,
        jobs: Vec<Job>,
        users: Vec<User>,
        report_accounts: Vec<ReportAccount>,
        config: &AppConfig,
    ) -> Self {
        Self {
            branches,
            jobs,
            users,
            report_accounts,
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
        }
    }
}

/// A queued optimistic write, tagged the way the endpoint expects.
///
/// These are the fire-and-forget pushes that follow a local commit:
/// the local state is already updated when one of these is enqueued,
/// and a push failure never rolls that commit back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum OutboxAction {
    /// Echo of a fresh registration
    #[serde(rename = "registerUser")]
    RegisterUser {
        #[serde(flatten)]
        user: User,
        timestamp: String,
    },
    /// Device-binding propagation after a first login
    #[serde(rename = "updateUserDevice")]
    UpdateUserDevice {
        #[serde(rename = "nationalId")]
        national_id: String,
        #[serde(rename = "deviceId")]
        device_id: String,
    },
    /// Attendance record propagation
    #[serde(rename = "saveAttendance")]
    SaveAttendance {
        #[serde(flatten)]
        record: AttendanceRecord,
        #[serde(rename = "nationalId")]
        national_id: String,
    },
}

impl OutboxAction {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            OutboxAction::RegisterUser { .. } => "registerUser",
            OutboxAction::UpdateUserDevice { .. } => "updateUserDevice",
            OutboxAction::SaveAttendance { .. } => "saveAttendance",
        }
    }
}

/// One row of `?action=getReportData`.
///
/// The endpoint flattens attendance records into viewer-facing rows
/// and filters them server-side to the account's allowed jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub date: String,
    pub time: String,
    pub name: String,
    pub national_id: String,
    #[serde(default)]
    pub job: String,
    pub branch: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub gps: String,
}
