//! Geoclock core — geofenced attendance and device-bound identity
//!
//! The engine behind the Geoclock attendance app: proves an employee
//! is physically near a registered branch before accepting a check-in
//! or check-out, binds one account to one device-storage token to
//! deter account sharing, and reconciles local state against a
//! spreadsheet-backed HTTP endpoint.
//!
//! The UI layer drives this crate and renders its errors; nothing in
//! here draws a screen or serves HTTP.

pub mod admin;
pub mod attendance;
pub mod bootstrap;
pub mod device;
pub mod geo;
pub mod identity;
pub mod state;
pub mod store;
pub mod sync;

pub use attendance::{AttendanceError, AttendanceService};
pub use device::{DeviceIdentity, FixedDeviceIdentity, StoredDeviceIdentity};
pub use identity::{IdentityError, IdentityResolver, Registration};
pub use state::AppState;
pub use store::{LocalStore, StoreError, StoreKey};
pub use sync::{
    HttpRemote, Outbox, OutboxWorker, RemoteApi, SyncConfig, SyncCoordinator, SyncError,
};

// Re-export shared types for convenience
pub use shared::models::{
    AppConfig, AttendanceKind, AttendanceRecord, Branch, GeoFix, Job, ReportAccount, Role, User,
};
