//! Spherical-Earth Geodesy
//!
//! Great-circle distance and destination-point projection on a mean-radius
//! spherical Earth model, plus the polygon builders the render layer uses
//! for range rings.
//!
//! All coordinates are (longitude, latitude) pairs in degrees. Bearings are
//! compass bearings: 0° = north, clockwise positive.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Longitude in degrees, positive east
    pub lon: f64,
    /// Latitude in degrees, positive north
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        GeoPoint { lon, lat }
    }
}

/// Haversine great-circle distance in meters between two points.
///
/// Symmetric, zero for identical points, never negative, and never exceeds
/// half the Earth's circumference (π · R).
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Project a point `distance_m` along the initial bearing `bearing_deg`
/// from `origin`.
///
/// The resulting longitude is normalized to the −180°..180° range.
/// A zero distance returns the origin unchanged; bearings outside
/// 0°..360° are accepted and wrap silently.
pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    if distance_m == 0.0 {
        return origin;
    }

    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.asin();

    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    GeoPoint {
        lon: (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
        lat: phi2.to_degrees(),
    }
}

/// Closed regular-polygon approximation of a circle of `radius_m` around
/// `center`.
///
/// Returns `segments + 1` points, the first repeated at the end so the
/// ring can be drawn as a closed line. An empty vector for `segments == 0`.
pub fn range_ring(center: GeoPoint, radius_m: f64, segments: usize) -> Vec<GeoPoint> {
    if segments == 0 {
        return Vec::new();
    }
    let mut ring: Vec<GeoPoint> = (0..segments)
        .map(|i| destination(center, i as f64 * 360.0 / segments as f64, radius_m))
        .collect();
    ring.push(ring[0]);
    ring
}
