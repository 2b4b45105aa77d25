//! Read-only snapshot views of the fusion model.
//!
//! Snapshots resolve every derived attribute (heading, direction cone,
//! rings, sensor alert state) at capture time so the render layer never
//! needs to reach back into the model. They serialize to the camelCase
//! JSON shape the render layer consumes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geo::GeoPoint;
use crate::model::FusionModel;
use crate::sensor::Sensor;
use crate::track::{Track, Waypoint};

/// Render-ready view of one track
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSnapshot {
    pub id: String,
    pub label: String,
    pub color: String,
    pub position: GeoPoint,
    pub spread_m: f64,
    pub radius: f64,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub saved_waypoints: Vec<Waypoint>,

    /// History trail, present only while trail display is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail: Option<Vec<GeoPoint>>,

    /// Closed highlight ring, present only while highlighting is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_ring: Option<Vec<GeoPoint>>,

    /// `[apex, left, right]` cone triangle, present only when cone
    /// display is enabled and the heading is defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_cone: Option<[GeoPoint; 3]>,
}

impl TrackSnapshot {
    fn capture(track: &Track, ring_segments: usize) -> Self {
        TrackSnapshot {
            id: track.id.clone(),
            label: track.label().to_string(),
            color: track.style.color.clone(),
            position: track.position,
            spread_m: track.spread_m,
            radius: track.radius,
            confidence: track.confidence,
            heading_deg: track.heading(),
            metadata: track.metadata.clone(),
            saved_waypoints: track.saved_waypoints.clone(),
            trail: track.style.show_trail.then(|| track.history.clone()),
            highlight_ring: track
                .style
                .highlight
                .then(|| track.highlight_ring(ring_segments)),
            direction_cone: if track.style.show_direction {
                track.direction_cone()
            } else {
                None
            },
        }
    }
}

/// Render-ready view of one sensor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pub id: String,
    pub position: GeoPoint,
    pub range_m: f64,
    /// True when at least one track was in range at capture time
    pub alert: bool,
    /// Closed detection-range outline
    pub range_ring: Vec<GeoPoint>,
}

impl SensorSnapshot {
    fn capture(sensor: &Sensor, alert: bool, ring_segments: usize) -> Self {
        SensorSnapshot {
            id: sensor.id.clone(),
            position: sensor.position,
            range_m: sensor.range_m,
            alert,
            range_ring: sensor.range_ring(ring_segments),
        }
    }
}

/// Point-in-time view of the whole model, ordered by entity id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSnapshot {
    pub tracks: Vec<TrackSnapshot>,
    pub sensors: Vec<SensorSnapshot>,
}

impl ModelSnapshot {
    pub(crate) fn capture(model: &FusionModel) -> Self {
        let segments = model.config().ring_segments;
        ModelSnapshot {
            tracks: model
                .tracks()
                .map(|t| TrackSnapshot::capture(t, segments))
                .collect(),
            sensors: model
                .sensors()
                .map(|s| SensorSnapshot::capture(s, s.alert(model.tracks()), segments))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FusionConfig;
    use crate::track::TrackStyle;

    fn populated_model() -> FusionModel {
        let mut m = FusionModel::new(FusionConfig::default());
        m.create_track(
            "Alpha",
            GeoPoint::new(18.5, 54.5),
            TrackStyle::with_color("orange"),
            HashMap::new(),
        )
        .unwrap();
        m.create_sensor("Camera 1", GeoPoint::new(18.51, 54.5), 7_000.0)
            .unwrap();
        m
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut m = populated_model();
        m.update_track_from_reports("Alpha", &[GeoPoint::new(18.52, 54.5)])
            .unwrap();

        let snap = m.snapshot();
        assert_eq!(snap.tracks.len(), 1);
        assert_eq!(snap.sensors.len(), 1);

        let t = &snap.tracks[0];
        assert_eq!(t.id, "Alpha");
        assert_eq!(t.position, GeoPoint::new(18.52, 54.5));
        assert_eq!(t.trail.as_ref().map(Vec::len), Some(2));

        let s = &snap.sensors[0];
        assert!(s.alert, "track ~650 m away must trip a 7 km sensor");
        assert_eq!(s.range_ring.len(), m.config().ring_segments + 1);
    }

    #[test]
    fn test_snapshot_hides_disabled_decorations() {
        let mut m = populated_model();
        m.set_trail_visible("Alpha", false).unwrap();

        let snap = m.snapshot();
        let t = &snap.tracks[0];
        assert!(t.trail.is_none());
        assert!(t.highlight_ring.is_none());
        // Cone display defaults off and the heading is still undefined
        assert!(t.direction_cone.is_none());
        assert!(t.heading_deg.is_none());
    }

    #[test]
    fn test_snapshot_cone_needs_heading() {
        let mut m = populated_model();
        m.set_direction_cone("Alpha", true, None, None).unwrap();
        assert!(m.snapshot().tracks[0].direction_cone.is_none());

        m.update_track_from_reports("Alpha", &[GeoPoint::new(18.6, 54.5)])
            .unwrap();
        assert!(m.snapshot().tracks[0].direction_cone.is_some());
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut m = populated_model();
        m.set_highlight("Alpha", true, None).unwrap();
        let json = serde_json::to_value(m.snapshot()).unwrap();

        let track = &json["tracks"][0];
        assert_eq!(track["id"], "Alpha");
        assert!(track.get("spreadM").is_some());
        assert!(track.get("savedWaypoints").is_some());
        assert!(track.get("highlightRing").is_some());
        let sensor = &json["sensors"][0];
        assert!(sensor.get("rangeM").is_some());
        assert!(sensor.get("rangeRing").is_some());
        assert_eq!(sensor["alert"], serde_json::json!(true));
    }
}
