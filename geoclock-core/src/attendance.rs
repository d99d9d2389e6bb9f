//! Attendance verification engine
//!
//! Decides accept/reject for a check-in/check-out claim against the
//! branch geofence, and on acceptance produces the immutable
//! [`AttendanceRecord`]. The threshold comparison always uses the raw
//! float distance; rounding happens only for the human-readable
//! rejection message.

use thiserror::Error;

use shared::CoreError;
use shared::cloud::OutboxAction;
use shared::models::{AttendanceKind, AttendanceRecord, Branch, GeoFix, User};
use shared::util::{entity_id, now_iso};

use crate::geo::distance_meters;
use crate::state::AppState;
use crate::store::StoreError;
use crate::sync::Outbox;

#[derive(Debug, Error)]
pub enum AttendanceError {
    /// No branch selected or no GPS fix yet
    #[error("select a branch and enable location first")]
    MissingInput,

    /// Selected branch id does not resolve in the registry (it was
    /// deleted or the registry was replaced under the caller). No
    /// record is produced; UI callers typically show nothing for
    /// this and refresh their branch list.
    #[error("selected branch no longer exists")]
    UnknownBranch,

    /// Outside the geofence. Distance is rounded for display only.
    #[error("you are {distance_m} m from the branch; allowed is {allowed_m} m")]
    OutOfRange { distance_m: i64, allowed_m: i64 },

    /// Local persistence of the accepted record failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AttendanceError> for CoreError {
    fn from(e: AttendanceError) -> Self {
        match e {
            AttendanceError::OutOfRange { .. } => CoreError::Geofence(e.to_string()),
            AttendanceError::Store(inner) => inner.into(),
            other => CoreError::Validation(other.to_string()),
        }
    }
}

/// Verify a claim and construct the record. No I/O; the only clock
/// access is the timestamp stamped into an accepted record.
pub fn attempt(
    kind: AttendanceKind,
    selected_branch_id: Option<&str>,
    fix: Option<GeoFix>,
    branches: &[Branch],
    actor: &User,
) -> Result<AttendanceRecord, AttendanceError> {
    let (branch_id, fix) = match (selected_branch_id, fix) {
        (Some(id), Some(fix)) if !id.is_empty() => (id, fix),
        _ => return Err(AttendanceError::MissingInput),
    };

    let branch = branches
        .iter()
        .find(|b| b.id == branch_id)
        .ok_or(AttendanceError::UnknownBranch)?;

    let distance = distance_meters(fix.latitude, fix.longitude, branch.latitude, branch.longitude);
    if distance > branch.radius_meters {
        return Err(AttendanceError::OutOfRange {
            distance_m: distance.round() as i64,
            allowed_m: branch.radius_meters.round() as i64,
        });
    }

    Ok(AttendanceRecord {
        id: entity_id(),
        user_id: actor.id.clone(),
        user_name: actor.full_name.clone(),
        user_job: actor.job_title.clone(),
        branch_id: branch.id.clone(),
        branch_name: branch.name.clone(),
        kind,
        timestamp: now_iso(),
        latitude: fix.latitude,
        longitude: fix.longitude,
    })
}

/// The last `n` records for a user, newest first (the employee's
/// recent-activity panel).
pub fn recent_for_user(
    records: &[AttendanceRecord],
    user_id: &str,
    n: usize,
) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|r| r.user_id == user_id)
        .rev()
        .take(n)
        .cloned()
        .collect()
}

/// Attendance engine wired to the local state and the outbox.
#[derive(Clone)]
pub struct AttendanceService {
    state: AppState,
    outbox: Outbox,
}

impl AttendanceService {
    pub fn new(state: AppState, outbox: Outbox) -> Self {
        Self { state, outbox }
    }

    /// Run the proximity check and, on acceptance, commit the record.
    ///
    /// The local append is optimistic and final: it is never rolled
    /// back, even if the queued remote push ultimately fails. A
    /// failure to even enqueue the push is logged and swallowed;
    /// the employee already checked in as far as this device is
    /// concerned.
    pub fn record(
        &self,
        kind: AttendanceKind,
        selected_branch_id: Option<&str>,
        fix: Option<GeoFix>,
        actor: &User,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let record = attempt(kind, selected_branch_id, fix, &self.state.branches(), actor)?;

        self.state.append_record(record.clone())?;

        if let Err(e) = self.outbox.enqueue(OutboxAction::SaveAttendance {
            record: record.clone(),
            national_id: actor.national_id.clone(),
        }) {
            tracing::error!(error = %e, "Failed to enqueue attendance push");
        }

        tracing::info!(
            user = %record.user_name,
            branch = %record.branch_name,
            kind = ?record.kind,
            "Attendance recorded"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;

    fn branch(id: &str, lat: f64, lon: f64, radius: f64) -> Branch {
        Branch {
            id: id.into(),
            name: "HQ".into(),
            latitude: lat,
            longitude: lon,
            radius_meters: radius,
        }
    }

    fn actor() -> User {
        User {
            id: "u1".into(),
            full_name: "Jane Doe".into(),
            national_id: "12345678901234".into(),
            password: Some("secret1".into()),
            role: Role::Employee,
            device_id: Some("dev_a".into()),
            job_title: Some("Engineer".into()),
            default_branch_id: None,
            registration_date: None,
            check_in_time: None,
            check_out_time: None,
        }
    }

    #[test]
    fn missing_branch_or_fix_is_rejected() {
        let branches = vec![branch("b1", 30.0, 31.0, 100.0)];
        let fix = GeoFix {
            latitude: 30.0,
            longitude: 31.0,
        };
        assert!(matches!(
            attempt(AttendanceKind::CheckIn, None, Some(fix), &branches, &actor()),
            Err(AttendanceError::MissingInput)
        ));
        assert!(matches!(
            attempt(AttendanceKind::CheckIn, Some("b1"), None, &branches, &actor()),
            Err(AttendanceError::MissingInput)
        ));
        assert!(matches!(
            attempt(AttendanceKind::CheckIn, Some(""), Some(fix), &branches, &actor()),
            Err(AttendanceError::MissingInput)
        ));
    }

    #[test]
    fn unresolvable_branch_produces_no_record() {
        let branches = vec![branch("b1", 30.0, 31.0, 100.0)];
        let fix = GeoFix {
            latitude: 30.0,
            longitude: 31.0,
        };
        assert!(matches!(
            attempt(AttendanceKind::CheckIn, Some("gone"), Some(fix), &branches, &actor()),
            Err(AttendanceError::UnknownBranch)
        ));
    }

    #[test]
    fn rejects_at_150_meters_with_rounded_distance() {
        // ~150 m north of the branch
        let branches = vec![branch("b1", 30.0444, 31.2357, 100.0)];
        let fix = GeoFix {
            latitude: 30.0444 + 150.0 / 111_195.0,
            longitude: 31.2357,
        };
        match attempt(AttendanceKind::CheckIn, Some("b1"), Some(fix), &branches, &actor()) {
            Err(AttendanceError::OutOfRange {
                distance_m,
                allowed_m,
            }) => {
                assert_eq!(distance_m, 150);
                assert_eq!(allowed_m, 100);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn accepts_inside_the_radius_with_raw_coordinates() {
        let branches = vec![branch("b1", 30.0444, 31.2357, 100.0)];
        let fix = GeoFix {
            latitude: 30.04441,
            longitude: 31.23572,
        };
        let record = attempt(AttendanceKind::CheckOut, Some("b1"), Some(fix), &branches, &actor())
            .expect("inside the fence");
        assert_eq!(record.kind, AttendanceKind::CheckOut);
        assert_eq!(record.branch_name, "HQ");
        assert_eq!(record.latitude, fix.latitude);
        assert_eq!(record.longitude, fix.longitude);
        assert_eq!(record.user_job.as_deref(), Some("Engineer"));
    }

    #[test]
    fn boundary_is_inclusive() {
        // Exactly on the radius is accepted; only strictly greater
        // distances are rejected.
        let branches = vec![branch("b1", 0.0, 0.0, 120.0)];
        let fix = GeoFix {
            latitude: 119.0 / 111_195.0,
            longitude: 0.0,
        };
        let result = attempt(AttendanceKind::CheckIn, Some("b1"), Some(fix), &branches, &actor());
        assert!(result.is_ok(), "boundary fix rejected: {result:?}");
    }

    #[test]
    fn recent_records_are_newest_first() {
        let mut records = Vec::new();
        for i in 0..7 {
            records.push(AttendanceRecord {
                id: format!("r{i}"),
                user_id: if i % 2 == 0 { "u1" } else { "u2" }.into(),
                user_name: "Jane".into(),
                user_job: None,
                branch_id: "b1".into(),
                branch_name: "HQ".into(),
                kind: AttendanceKind::CheckIn,
                timestamp: format!("2026-01-0{}T08:00:00Z", i + 1),
                latitude: 0.0,
                longitude: 0.0,
            });
        }
        let recent = recent_for_user(&records, "u1", 3);
        assert_eq!(
            recent.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            vec!["r6", "r4", "r2"]
        );
    }
}
