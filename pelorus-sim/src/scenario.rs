//! The reference two-ship scenario.
//!
//! "Alpha" drifts northeast with three loosely-spread sources; "Beta"
//! runs east with two tight sources for the first ten steps, then jumps
//! north and reports eight clustered sources (low spread, high count).
//! Two cameras watch the bay; waypoints are saved for both ships at
//! step 5.

use std::collections::HashMap;

use pelorus_core::{FusionModel, GeoPoint, ModelError, TrackStyle};

pub const WAYPOINT_STEP: u32 = 5;

/// Create the scenario's tracks and sensors in `model`.
pub fn setup(model: &mut FusionModel) -> Result<(), ModelError> {
    let mut alpha_info = HashMap::new();
    alpha_info.insert("type".to_string(), serde_json::json!("Cargo"));
    model.create_track(
        "Alpha",
        GeoPoint::new(18.5, 54.5),
        TrackStyle {
            label: Some("Alpha".to_string()),
            highlight: true,
            show_direction: true,
            ..TrackStyle::with_color("orange")
        },
        alpha_info,
    )?;

    let mut beta_info = HashMap::new();
    beta_info.insert("type".to_string(), serde_json::json!("Tanker"));
    model.create_track(
        "Beta",
        GeoPoint::new(18.8, 54.4),
        TrackStyle {
            label: Some("Beta".to_string()),
            show_direction: true,
            ..TrackStyle::with_color("blue")
        },
        beta_info,
    )?;

    model.create_sensor("Camera 1", GeoPoint::new(19.0, 54.6), 7_000.0)?;
    model.create_sensor("Camera 2", GeoPoint::new(18.7, 54.7), 5_000.0)?;
    Ok(())
}

/// Report batch for "Alpha" at `step`
pub fn alpha_reports(step: u32) -> Vec<GeoPoint> {
    let base_x = 18.5 + step as f64 * 0.01;
    let base_y = 54.5 + step as f64 * 0.005;
    vec![
        GeoPoint::new(base_x, base_y),
        GeoPoint::new(base_x + 0.003, base_y - 0.003),
        GeoPoint::new(base_x - 0.002, base_y + 0.002),
    ]
}

/// Report batch for "Beta" at `step`
pub fn beta_reports(step: u32) -> Vec<GeoPoint> {
    let base_x = 18.8 + step as f64 * 0.015;
    if step < 10 {
        vec![GeoPoint::new(base_x, 54.4), GeoPoint::new(base_x + 0.001, 54.4)]
    } else {
        let mut reports = vec![GeoPoint::new(base_x, 54.7)];
        reports.extend(std::iter::repeat(GeoPoint::new(base_x + 0.001, 54.8)).take(7));
        reports
    }
}

/// Advance the scenario by one step.
pub fn step(model: &mut FusionModel, step: u32) -> Result<(), ModelError> {
    model.update_track_from_reports("Alpha", &alpha_reports(step))?;
    model.update_track_from_reports("Beta", &beta_reports(step))?;
    if step == WAYPOINT_STEP {
        model.save_waypoint("Alpha", None)?;
        model.save_waypoint("Beta", None)?;
    }
    Ok(())
}
