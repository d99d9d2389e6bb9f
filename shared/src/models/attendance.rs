//! Attendance Model

use serde::{Deserialize, Serialize};

/// Direction of an attendance action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceKind {
    #[serde(rename = "check-in")]
    CheckIn,
    #[serde(rename = "check-out")]
    CheckOut,
}

/// One accepted check-in or check-out.
///
/// Immutable once created: no actor in the system edits or deletes a
/// record. Only the attendance verification engine constructs one,
/// after the proximity check passes. User name and job title are
/// denormalized at creation time so later registry edits do not
/// rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_job: Option<String>,
    pub branch_id: String,
    pub branch_name: String,
    #[serde(rename = "type")]
    pub kind: AttendanceKind,
    /// ISO-8601 creation time
    pub timestamp: String,
    /// Raw GPS fix the proximity check ran against
    pub latitude: f64,
    pub longitude: f64,
}

/// A live GPS fix from the geolocation sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}
