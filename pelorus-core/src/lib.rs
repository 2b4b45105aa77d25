//! Pelorus Core - Multi-Source Ship-Track Fusion
//!
//! This crate fuses batches of noisy position reports into one fused
//! track state per ship and derives the render attributes (spread,
//! confidence, heading, cones, rings, sensor alerts) a map display
//! needs. It is platform-independent: no I/O, no timers, no async, so
//! it can be driven by a CLI simulation loop, a UI timer, or a test
//! harness alike.
//!
//! # Architecture
//!
//! - **geo**: spherical-Earth distance, destination-point projection
//!   and range-ring builders
//! - **track**: track entity, styling and derived geometry
//! - **sensor**: fixed sensors with detection-radius alerting
//! - **model**: the fusion model owning all entities, plus snapshots
//! - **error**: the error taxonomy
//!
//! # Usage
//!
//! ```rust,ignore
//! use pelorus_core::{FusionConfig, FusionModel, GeoPoint, TrackStyle};
//!
//! let mut model = FusionModel::new(FusionConfig::default());
//! model.create_track("Alpha", GeoPoint::new(18.5, 54.5),
//!                    TrackStyle::with_color("orange"), Default::default())?;
//! model.create_sensor("Camera 1", GeoPoint::new(19.0, 54.6), 7_000.0)?;
//!
//! // Driven once per tick by an external scheduler:
//! model.update_track_from_reports("Alpha", &reports)?;
//!
//! // Hand the resolved view to the renderer:
//! let snapshot = model.snapshot();
//! ```

pub mod error;
pub mod geo;
pub mod model;
pub mod sensor;
pub mod track;

pub use error::ModelError;
pub use geo::{destination, distance_m, range_ring, GeoPoint, EARTH_RADIUS_M};
pub use model::{
    ConfidencePolicy, FusionConfig, FusionModel, ModelSnapshot, SensorSnapshot, TrackSnapshot,
};
pub use sensor::Sensor;
pub use track::{Track, TrackStyle, Waypoint};
