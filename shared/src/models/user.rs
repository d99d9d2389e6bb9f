//! User Model

use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Admin,
}

/// An employee account (or the synthesized admin).
///
/// `national_id` is the natural business key: login and duplicate
/// prevention match on it, never on `id`. `device_id` is absent until
/// the first successful registration or first login binds one; once
/// set it stays until an admin explicitly clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    /// 14-digit national id, unique across the registry
    pub national_id: String,
    /// Plaintext by design; the endpoint stores it as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    /// Scheduled shift start (HH:MM), edited by the admin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    /// Scheduled shift end (HH:MM), edited by the admin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
}

impl User {
    /// Whether a device is currently bound to this account.
    pub fn is_device_bound(&self) -> bool {
        self.device_id.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Admin-editable user fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub job_title: Option<String>,
    pub default_branch_id: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}
