//! Report Account Model

use serde::{Deserialize, Serialize};

/// A third-party report viewer account.
///
/// Scopes the viewer to attendance records whose `user_job` is in
/// `allowed_jobs` (matched by job *title*; the endpoint filters
/// server-side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAccount {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub allowed_jobs: Vec<String>,
}
