//! End-to-end geofence flows: admin provisions a branch, an employee
//! registers, logs in and checks in/out against the fence.

mod common;

use common::TestEnv;
use geoclock_core::{AttendanceKind, GeoFix, admin, attendance, geo};
use shared::models::BranchCreate;

fn registration(national_id: &str) -> geoclock_core::Registration {
    geoclock_core::Registration {
        full_name: "Jane Doe".into(),
        national_id: national_id.into(),
        password: "secret1".into(),
        job_title: "Engineer".into(),
        default_branch_id: None,
    }
}

#[test]
fn distance_is_zero_for_identical_points_and_symmetric() {
    assert_eq!(geo::distance_meters(30.0444, 31.2357, 30.0444, 31.2357), 0.0);
    let d1 = geo::distance_meters(30.0, 31.0, 30.1, 31.1);
    let d2 = geo::distance_meters(30.1, 31.1, 30.0, 31.0);
    assert_eq!(d1, d2);
}

#[tokio::test]
async fn check_in_at_the_branch_produces_exactly_one_record() {
    let env = TestEnv::new();

    // Admin provisions the workplace.
    let branch = admin::add_branch(
        &env.state,
        BranchCreate {
            name: "HQ".into(),
            latitude: 30.0,
            longitude: 31.0,
            radius_meters: 50.0,
        },
    )
    .unwrap();
    admin::add_job(&env.state, "Engineer").unwrap();

    // Employee registers and logs in on this device.
    let user = env.identity.register(registration("12345678901234")).await.unwrap();
    env.identity.logout().unwrap();
    let user = env
        .identity
        .login(&user.national_id, "secret1")
        .await
        .unwrap();

    // GPS fix right at the branch: distance 0 ≤ 50.
    let before = env.state.records();
    let record = env
        .attendance
        .record(
            AttendanceKind::CheckIn,
            Some(&branch.id),
            Some(GeoFix {
                latitude: 30.0,
                longitude: 31.0,
            }),
            &user,
        )
        .unwrap();

    assert_eq!(record.kind, AttendanceKind::CheckIn);
    assert_eq!(record.branch_name, "HQ");
    assert_eq!(record.user_job.as_deref(), Some("Engineer"));

    let after = env.state.records();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.last().unwrap(), &record);
    // The attendance push was queued for the endpoint.
    assert!(env.remote.pushed_labels().is_empty());
    assert!(!env.outbox.is_empty());
}

#[tokio::test]
async fn out_of_range_check_in_appends_nothing() {
    let env = TestEnv::new();
    let branch = admin::add_branch(
        &env.state,
        BranchCreate {
            name: "HQ".into(),
            latitude: 30.0,
            longitude: 31.0,
            radius_meters: 50.0,
        },
    )
    .unwrap();
    admin::add_job(&env.state, "Engineer").unwrap();
    let user = env.identity.register(registration("12345678901234")).await.unwrap();

    // ~150 m away from a 50 m fence.
    let result = env.attendance.record(
        AttendanceKind::CheckIn,
        Some(&branch.id),
        Some(GeoFix {
            latitude: 30.0 + 150.0 / 111_195.0,
            longitude: 31.0,
        }),
        &user,
    );

    match result {
        Err(attendance::AttendanceError::OutOfRange {
            distance_m,
            allowed_m,
        }) => {
            assert_eq!(allowed_m, 50);
            assert!((149..=151).contains(&distance_m), "distance {distance_m}");
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert!(env.state.records().is_empty());
    // Only the registration echo is queued; no attendance push.
    let labels: Vec<_> = env.outbox.pending().iter().map(|e| e.action.label()).collect();
    assert_eq!(labels, vec!["registerUser"]);
}

#[tokio::test]
async fn existing_records_are_never_mutated_by_new_ones() {
    let env = TestEnv::new();
    let branch = admin::add_branch(
        &env.state,
        BranchCreate {
            name: "HQ".into(),
            latitude: 30.0,
            longitude: 31.0,
            radius_meters: 100.0,
        },
    )
    .unwrap();
    admin::add_job(&env.state, "Engineer").unwrap();
    let user = env.identity.register(registration("12345678901234")).await.unwrap();

    let fix = GeoFix {
        latitude: 30.0,
        longitude: 31.0,
    };
    let first = env
        .attendance
        .record(AttendanceKind::CheckIn, Some(&branch.id), Some(fix), &user)
        .unwrap();
    let snapshot = env.state.records();

    let second = env
        .attendance
        .record(AttendanceKind::CheckOut, Some(&branch.id), Some(fix), &user)
        .unwrap();

    let records = env.state.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], first);
    assert_eq!(records[0], snapshot[0]);
    assert_ne!(second.id, first.id);
}
