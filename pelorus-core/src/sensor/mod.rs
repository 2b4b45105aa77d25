//! Fixed Sensor Entities
//!
//! Sensors ("cameras") sit at a fixed position with a detection radius and
//! alert when at least one live track is within range. The alert state is
//! derived on query, never stored.

use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint};
use crate::track::Track;

/// A fixed-position sensor with a detection radius
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    /// Unique name, immutable after creation
    pub id: String,

    /// Fixed position; repositioned only by an explicit move
    pub position: GeoPoint,

    /// Detection radius in meters, always positive
    pub range_m: f64,
}

impl Sensor {
    pub fn new(id: impl Into<String>, position: GeoPoint, range_m: f64) -> Self {
        Sensor {
            id: id.into(),
            position,
            range_m,
        }
    }

    /// True when `point` lies within detection range (inclusive)
    pub fn covers(&self, point: GeoPoint) -> bool {
        geo::distance_m(self.position, point) <= self.range_m
    }

    /// True when at least one track is within range.
    ///
    /// Short-circuits on the first hit; false for an empty track set.
    pub fn alert<'a, I>(&self, tracks: I) -> bool
    where
        I: IntoIterator<Item = &'a Track>,
    {
        tracks.into_iter().any(|t| self.covers(t.position))
    }

    /// Closed detection-range outline for the render layer
    pub fn range_ring(&self, segments: usize) -> Vec<GeoPoint> {
        geo::range_ring(self.position, self.range_m, segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackStyle;
    use std::collections::HashMap;

    fn sensor() -> Sensor {
        Sensor::new("Camera 1", GeoPoint::new(19.0, 54.6), 15_000.0)
    }

    fn track_at_bearing(sensor: &Sensor, bearing_deg: f64, distance_m: f64) -> Track {
        Track::new(
            "Alpha",
            geo::destination(sensor.position, bearing_deg, distance_m),
            TrackStyle::default(),
            HashMap::new(),
        )
    }

    #[test]
    fn test_covers_inside_and_outside() {
        let s = sensor();
        assert!(s.covers(geo::destination(s.position, 270.0, 12_000.0)));
        assert!(!s.covers(geo::destination(s.position, 270.0, 20_000.0)));
    }

    #[test]
    fn test_alert_requires_one_track_in_range() {
        let s = sensor();
        let near = track_at_bearing(&s, 270.0, 12_000.0);
        let far = track_at_bearing(&s, 90.0, 20_000.0);

        assert!(s.alert([&far, &near]));
        assert!(!s.alert([&far]));
    }

    #[test]
    fn test_alert_false_for_empty_set() {
        assert!(!sensor().alert(std::iter::empty::<&Track>()));
    }

    #[test]
    fn test_range_ring_radius() {
        let s = sensor();
        let ring = s.range_ring(64);
        assert_eq!(ring.len(), 65);
        for p in &ring[..64] {
            assert!((geo::distance_m(s.position, *p) - s.range_m).abs() < 1.0);
        }
    }
}
