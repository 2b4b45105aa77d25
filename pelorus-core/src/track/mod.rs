//! Track Entities
//!
//! A track represents one mobile unit ("ship") whose position is estimated
//! by fusing batches of noisy position reports. The track itself only holds
//! fused state; the fusion step lives in
//! [`FusionModel::update_track_from_reports`](crate::model::FusionModel::update_track_from_reports).
//!
//! Derived render geometry (heading, direction cone, highlight ring) is
//! computed on demand rather than stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::geo::{self, GeoPoint};

/// Display styling for a track.
///
/// These are model-side attributes that the render layer reads as-is;
/// none of them affect fusion except `base_size`, which scales the
/// spread-derived radius hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStyle {
    /// Marker color (CSS color string)
    pub color: String,

    /// Display label; falls back to the track id when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Base marker size before spread scaling
    pub base_size: f64,

    /// Whether the render layer should draw the position history trail
    pub show_trail: bool,

    /// Whether to draw a highlight ring around the marker
    pub highlight: bool,

    /// Highlight ring radius in meters
    pub highlight_radius_m: f64,

    /// Whether to draw the direction cone
    pub show_direction: bool,

    /// Full opening angle of the direction cone in degrees
    pub cone_angle_deg: f64,

    /// Length of the direction cone edges in meters
    pub cone_length_m: f64,
}

impl Default for TrackStyle {
    fn default() -> Self {
        TrackStyle {
            color: "#e74c3c".to_string(),
            label: None,
            base_size: 12.0,
            show_trail: true,
            highlight: false,
            highlight_radius_m: 5_000.0,
            show_direction: false,
            cone_angle_deg: 30.0,
            cone_length_m: 20_000.0,
        }
    }
}

impl TrackStyle {
    /// Style with the given color and defaults for everything else
    pub fn with_color(color: impl Into<String>) -> Self {
        TrackStyle {
            color: color.into(),
            ..TrackStyle::default()
        }
    }
}

/// A manually saved position snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: GeoPoint,
    pub label: String,
}

/// One tracked ship.
///
/// Invariants maintained by the fusion model:
/// - `history` is never empty (seeded with the initial position)
/// - `history.last() == position` after every fusion update
/// - `history` and `saved_waypoints` are append-only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique name, immutable after creation
    pub id: String,

    /// Current fused position
    pub position: GeoPoint,

    /// Past fused positions, one appended per fusion update
    pub history: Vec<GeoPoint>,

    /// Max pairwise distance of the last report batch, in meters
    pub spread_m: f64,

    /// Spread-scaled marker size hint
    pub radius: f64,

    /// Report-count-derived display opacity, within the configured
    /// `[min_opacity, 1.0]` band
    pub confidence: f64,

    /// Display styling
    pub style: TrackStyle,

    /// Arbitrary display attributes (type, speed, destination, ...).
    /// `sourceCount` is set by every fusion update.
    pub metadata: HashMap<String, serde_json::Value>,

    /// Explicitly saved positions, append-only
    pub saved_waypoints: Vec<Waypoint>,
}

impl Track {
    /// Create a track at `position` with a single-point history.
    pub fn new(
        id: impl Into<String>,
        position: GeoPoint,
        style: TrackStyle,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        let radius = style.base_size;
        Track {
            id: id.into(),
            position,
            history: vec![position],
            spread_m: 0.0,
            radius,
            confidence: 1.0,
            style,
            metadata,
            saved_waypoints: Vec::new(),
        }
    }

    /// Display label, falling back to the id
    pub fn label(&self) -> &str {
        self.style.label.as_deref().unwrap_or(&self.id)
    }

    /// Planar heading in degrees derived from the last two history points.
    ///
    /// Math convention: `atan2(Δlat, Δlon)`, so 0° = east, counterclockwise
    /// positive. The render layer feeds this value straight into
    /// [`geo::destination`] when building the cone. `None` until the track
    /// has two distinct consecutive positions.
    pub fn heading(&self) -> Option<f64> {
        let n = self.history.len();
        if n < 2 {
            return None;
        }
        let prev = self.history[n - 2];
        let curr = self.history[n - 1];
        let d_lon = curr.lon - prev.lon;
        let d_lat = curr.lat - prev.lat;
        if d_lon == 0.0 && d_lat == 0.0 {
            return None;
        }
        Some(d_lat.atan2(d_lon).to_degrees())
    }

    /// Direction cone as `[apex, left edge end, right edge end]`.
    ///
    /// The two edges are rays at ± half the cone angle around the current
    /// heading, `cone_length_m` long. `None` while the heading is undefined.
    pub fn direction_cone(&self) -> Option<[GeoPoint; 3]> {
        let heading = self.heading()?;
        let half = self.style.cone_angle_deg / 2.0;
        let left = geo::destination(self.position, heading - half, self.style.cone_length_m);
        let right = geo::destination(self.position, heading + half, self.style.cone_length_m);
        Some([self.position, left, right])
    }

    /// Closed highlight ring around the current position
    pub fn highlight_ring(&self, segments: usize) -> Vec<GeoPoint> {
        geo::range_ring(self.position, self.style.highlight_radius_m, segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_at(lon: f64, lat: f64) -> Track {
        Track::new(
            "Alpha",
            GeoPoint::new(lon, lat),
            TrackStyle::default(),
            HashMap::new(),
        )
    }

    #[test]
    fn test_new_track_seeds_history() {
        let track = track_at(18.5, 54.5);
        assert_eq!(track.history.len(), 1);
        assert_eq!(track.history[0], track.position);
        assert_eq!(track.spread_m, 0.0);
        assert_eq!(track.confidence, 1.0);
        assert!(track.saved_waypoints.is_empty());
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let mut track = track_at(18.5, 54.5);
        assert_eq!(track.label(), "Alpha");
        track.style.label = Some("MV Alpha".to_string());
        assert_eq!(track.label(), "MV Alpha");
    }

    #[test]
    fn test_heading_undefined_with_single_point() {
        let track = track_at(18.5, 54.5);
        assert!(track.heading().is_none());
        assert!(track.direction_cone().is_none());
    }

    #[test]
    fn test_heading_undefined_when_stationary() {
        let mut track = track_at(18.5, 54.5);
        track.history.push(GeoPoint::new(18.5, 54.5));
        assert!(track.heading().is_none());
    }

    #[test]
    fn test_heading_east_and_north() {
        let mut east = track_at(18.5, 54.5);
        east.history.push(GeoPoint::new(18.6, 54.5));
        assert_eq!(east.heading(), Some(0.0));

        let mut north = track_at(18.5, 54.5);
        north.history.push(GeoPoint::new(18.5, 54.6));
        assert_eq!(north.heading(), Some(90.0));
    }

    #[test]
    fn test_direction_cone_geometry() {
        let mut track = track_at(18.5, 54.5);
        track.position = GeoPoint::new(18.6, 54.5);
        track.history.push(track.position);

        let [apex, left, right] = track.direction_cone().unwrap();
        assert_eq!(apex, track.position);
        let len = track.style.cone_length_m;
        assert!((crate::geo::distance_m(apex, left) - len).abs() < 1.0);
        assert!((crate::geo::distance_m(apex, right) - len).abs() < 1.0);
        // Edges must be distinct for a nonzero cone angle
        assert!(crate::geo::distance_m(left, right) > 1.0);
    }

    #[test]
    fn test_highlight_ring_uses_style_radius() {
        let track = track_at(18.5, 54.5);
        let ring = track.highlight_ring(32);
        assert_eq!(ring.len(), 33);
        for p in &ring[..32] {
            let d = crate::geo::distance_m(track.position, *p);
            assert!((d - track.style.highlight_radius_m).abs() < 1.0);
        }
    }
}
