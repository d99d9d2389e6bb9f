//! Great-circle distance
//!
//! Haversine is accurate to well under a meter at geofence scale
//! (tens to hundreds of meters); ellipsoid corrections are not worth
//! carrying here.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two WGS-84 coordinates, in meters.
///
/// Pure function. NaN inputs propagate to a NaN result; callers that
/// feed sensor data in are expected to have a real fix.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
