//! Branch Model

use serde::{Deserialize, Serialize};

/// A physical work site with a circular geofence around it.
///
/// Identity is `id`; branch names are display labels and uniqueness is
/// not enforced. `radius_meters` must be positive (validated at
/// create/update time, see the admin operations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "radius")]
    pub radius_meters: f64,
}

/// Create branch payload (id is generated on insert)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCreate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "radius")]
    pub radius_meters: f64,
}

/// Update branch payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchUpdate {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "radius")]
    pub radius_meters: Option<f64>,
}
