//! Track Fusion Model
//!
//! This module owns all track and sensor entities and fuses batches of
//! noisy position reports into a single fused state per track. It is a
//! pure in-memory state machine over discrete update calls: no timers,
//! no I/O, no interior concurrency. An external driver feeds one report
//! batch per track per tick and reads snapshots back out.
//!
//! # Example
//!
//! ```rust,ignore
//! use pelorus_core::model::{FusionConfig, FusionModel};
//! use pelorus_core::{GeoPoint, TrackStyle};
//!
//! let mut model = FusionModel::new(FusionConfig::default());
//! model.create_track("Alpha", GeoPoint::new(18.5, 54.5), TrackStyle::default(), Default::default())?;
//! model.create_sensor("Camera 1", GeoPoint::new(19.0, 54.6), 7_000.0)?;
//!
//! // Once per tick:
//! model.update_track_from_reports("Alpha", &reports)?;
//! let snapshot = model.snapshot();
//! ```
//!
//! # Failure semantics
//!
//! Creating a duplicate id or a sensor with a non-positive range fails.
//! Every other lookup-by-id miss and every empty report batch is a
//! silent no-op by default, so driver loops may reference entities that
//! do not (yet) exist. [`FusionConfig::strict`] turns those no-ops into
//! errors.

mod snapshot;

pub use snapshot::{ModelSnapshot, SensorSnapshot, TrackSnapshot};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::ModelError;
use crate::geo::{self, GeoPoint};
use crate::sensor::Sensor;
use crate::track::{Track, TrackStyle, Waypoint};

/// How report count maps to display confidence.
///
/// The two variants invert the relationship between source count and
/// confidence; they are deliberately not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// More sources means more positional disagreement, so confidence
    /// falls with source count: `clamp(min, 1.0, 1 − n/max)`.
    DecreasingWithSources,
    /// More sources means more corroboration, so confidence ramps up:
    /// `min + (1 − min) · min(n−1, max−1)/(max−1)`.
    IncreasingWithSources,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        ConfidencePolicy::DecreasingWithSources
    }
}

impl ConfidencePolicy {
    /// Confidence for a batch of `sources` reports, within `[min_opacity, 1.0]`.
    pub fn confidence(&self, sources: usize, max_sources: usize, min_opacity: f64) -> f64 {
        match self {
            ConfidencePolicy::DecreasingWithSources => {
                (1.0 - sources as f64 / max_sources as f64).clamp(min_opacity, 1.0)
            }
            ConfidencePolicy::IncreasingWithSources => {
                if max_sources <= 1 {
                    return 1.0;
                }
                let steps = sources.saturating_sub(1).min(max_sources - 1) as f64;
                min_opacity + (1.0 - min_opacity) * steps / (max_sources - 1) as f64
            }
        }
    }
}

/// Tunables for the fusion model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FusionConfig {
    /// Spread saturation point in meters; beyond this, additional spread
    /// has no further effect on the size hint
    pub max_spread_m: f64,

    /// Source count at which the confidence curve saturates
    pub max_sources: usize,

    /// Lower bound of the confidence band
    pub min_opacity: f64,

    /// Confidence curve selection
    pub confidence_policy: ConfidencePolicy,

    /// Segment count for generated range rings
    pub ring_segments: usize,

    /// Report unknown ids and empty batches as errors instead of
    /// silently ignoring them
    pub strict: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        FusionConfig {
            max_spread_m: 20_000.0,
            max_sources: 10,
            min_opacity: 0.2,
            confidence_policy: ConfidencePolicy::default(),
            ring_segments: 64,
            strict: false,
        }
    }
}

fn missing(strict: bool, id: &str) -> Result<(), ModelError> {
    if strict {
        Err(ModelError::UnknownEntity(id.to_string()))
    } else {
        Ok(())
    }
}

/// Owns all track and sensor entities for one session.
///
/// Entities live in flat id-keyed maps and are created and removed
/// explicitly; there is no automatic expiry. Instantiate one model per
/// session or test, never a process-wide singleton.
#[derive(Debug, Clone, Default)]
pub struct FusionModel {
    config: FusionConfig,
    tracks: BTreeMap<String, Track>,
    sensors: BTreeMap<String, Sensor>,
}

impl FusionModel {
    pub fn new(config: FusionConfig) -> Self {
        FusionModel {
            config,
            tracks: BTreeMap::new(),
            sensors: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Tracks
    // ------------------------------------------------------------------

    /// Create a track seeded at `position` with `confidence = 1.0` and a
    /// single-point history.
    pub fn create_track(
        &mut self,
        id: impl Into<String>,
        position: GeoPoint,
        style: TrackStyle,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Result<(), ModelError> {
        let id = id.into();
        if self.tracks.contains_key(&id) {
            return Err(ModelError::DuplicateEntity(id));
        }
        let track = Track::new(id.clone(), position, style, metadata);
        self.tracks.insert(id, track);
        Ok(())
    }

    /// Remove a track. No-op on unknown id.
    pub fn remove_track(&mut self, id: &str) -> Result<(), ModelError> {
        if self.tracks.remove(id).is_none() {
            return missing(self.config.strict, id);
        }
        Ok(())
    }

    /// Fuse a batch of raw position reports into the track state.
    ///
    /// Sets the fused position to the componentwise mean of `reports`,
    /// the spread to their max pairwise distance, recomputes the size
    /// hint and confidence, appends the fused position to the history
    /// and records the report count in `metadata["sourceCount"]`.
    ///
    /// No-op on unknown id or empty batch.
    pub fn update_track_from_reports(
        &mut self,
        id: &str,
        reports: &[GeoPoint],
    ) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let max_spread_m = self.config.max_spread_m;
        let max_sources = self.config.max_sources;
        let min_opacity = self.config.min_opacity;
        let policy = self.config.confidence_policy;

        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        if reports.is_empty() {
            if strict {
                return Err(ModelError::EmptyReportBatch(id.to_string()));
            }
            return Ok(());
        }

        let n = reports.len();
        track.position = GeoPoint::new(
            reports.iter().map(|p| p.lon).sum::<f64>() / n as f64,
            reports.iter().map(|p| p.lat).sum::<f64>() / n as f64,
        );

        let mut spread = 0.0_f64;
        for i in 0..n {
            for j in (i + 1)..n {
                spread = spread.max(geo::distance_m(reports[i], reports[j]));
            }
        }
        track.spread_m = spread;

        let saturation = (spread / max_spread_m).min(1.0);
        track.radius = track.style.base_size * (1.0 + saturation);

        track.confidence = policy.confidence(n, max_sources, min_opacity);

        track.history.push(track.position);
        track
            .metadata
            .insert("sourceCount".to_string(), serde_json::json!(n));
        Ok(())
    }

    /// Save the current fused position as a waypoint.
    ///
    /// Without an explicit label, `"{id}—Pt{n}"` is generated from the
    /// 1-based running count of that track's saves. No-op on unknown id.
    pub fn save_waypoint(&mut self, id: &str, label: Option<&str>) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        let label = match label {
            Some(l) => l.to_string(),
            None => format!("{}—Pt{}", track.id, track.saved_waypoints.len() + 1),
        };
        track.saved_waypoints.push(Waypoint {
            position: track.position,
            label,
        });
        Ok(())
    }

    /// Toggle trail display. No-op on unknown id.
    pub fn set_trail_visible(&mut self, id: &str, show: bool) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        track.style.show_trail = show;
        Ok(())
    }

    /// Toggle the highlight ring, optionally changing its radius.
    /// No-op on unknown id.
    pub fn set_highlight(
        &mut self,
        id: &str,
        highlight: bool,
        radius_m: Option<f64>,
    ) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        track.style.highlight = highlight;
        if let Some(radius_m) = radius_m {
            track.style.highlight_radius_m = radius_m;
        }
        Ok(())
    }

    /// Toggle the direction cone, optionally changing its opening angle
    /// or length. No-op on unknown id.
    pub fn set_direction_cone(
        &mut self,
        id: &str,
        show: bool,
        angle_deg: Option<f64>,
        length_m: Option<f64>,
    ) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        track.style.show_direction = show;
        if let Some(angle_deg) = angle_deg {
            track.style.cone_angle_deg = angle_deg;
        }
        if let Some(length_m) = length_m {
            track.style.cone_length_m = length_m;
        }
        Ok(())
    }

    /// Change marker color and/or label. No-op on unknown id.
    pub fn set_track_style(
        &mut self,
        id: &str,
        color: Option<&str>,
        label: Option<&str>,
    ) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(track) = self.tracks.get_mut(id) else {
            return missing(strict, id);
        };
        if let Some(color) = color {
            track.style.color = color.to_string();
        }
        if let Some(label) = label {
            track.style.label = Some(label.to_string());
        }
        Ok(())
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    // ------------------------------------------------------------------
    // Sensors
    // ------------------------------------------------------------------

    /// Create a fixed sensor. The detection range must be positive.
    pub fn create_sensor(
        &mut self,
        id: impl Into<String>,
        position: GeoPoint,
        range_m: f64,
    ) -> Result<(), ModelError> {
        let id = id.into();
        if range_m <= 0.0 {
            return Err(ModelError::InvalidRange(range_m));
        }
        if self.sensors.contains_key(&id) {
            return Err(ModelError::DuplicateEntity(id));
        }
        let sensor = Sensor::new(id.clone(), position, range_m);
        self.sensors.insert(id, sensor);
        Ok(())
    }

    /// Remove a sensor. No-op on unknown id.
    pub fn remove_sensor(&mut self, id: &str) -> Result<(), ModelError> {
        if self.sensors.remove(id).is_none() {
            return missing(self.config.strict, id);
        }
        Ok(())
    }

    /// Reposition a sensor. No-op on unknown id.
    pub fn move_sensor(&mut self, id: &str, position: GeoPoint) -> Result<(), ModelError> {
        let strict = self.config.strict;
        let Some(sensor) = self.sensors.get_mut(id) else {
            return missing(strict, id);
        };
        sensor.position = position;
        Ok(())
    }

    /// Change a sensor's detection range. The new range must be positive.
    /// No-op on unknown id.
    pub fn set_sensor_range(&mut self, id: &str, range_m: f64) -> Result<(), ModelError> {
        if range_m <= 0.0 {
            return Err(ModelError::InvalidRange(range_m));
        }
        let strict = self.config.strict;
        let Some(sensor) = self.sensors.get_mut(id) else {
            return missing(strict, id);
        };
        sensor.range_m = range_m;
        Ok(())
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors.get(id)
    }

    pub fn sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    /// Whether any live track is within the sensor's detection range.
    /// False for an unknown sensor id.
    pub fn sensor_alert(&self, id: &str) -> bool {
        self.sensors
            .get(id)
            .map(|s| s.alert(self.tracks.values()))
            .unwrap_or(false)
    }

    /// Read-only snapshot of every entity, with all derived render
    /// attributes (heading, cones, rings, alert states) resolved.
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::capture(self)
    }
}
