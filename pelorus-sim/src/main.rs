//! Simulation driver for the Pelorus fusion model.
//!
//! Owns the tick cadence the core deliberately does not: replays the
//! reference two-ship scenario at a fixed interval, feeding report
//! batches into [`pelorus_core::FusionModel`] and logging the fused
//! state and sensor alert transitions each tick. `--json` dumps the
//! final snapshot for a render layer to consume.

mod scenario;

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{debug, info, warn};

use pelorus_core::{FusionConfig, FusionModel};

#[derive(Parser, Debug)]
#[command(name = "pelorus-sim", version, about, long_about = None)]
struct Args {
    /// Number of simulation steps to run
    #[arg(long, default_value_t = 40)]
    steps: u32,

    /// Tick interval in milliseconds
    #[arg(long, default_value_t = 300)]
    interval_ms: u64,

    /// Print the final model snapshot as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Fail on unknown ids and empty report batches instead of ignoring them
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let config = FusionConfig {
        strict: args.strict,
        ..FusionConfig::default()
    };
    let mut model = FusionModel::new(config);
    scenario::setup(&mut model).context("scenario setup")?;

    let sensor_ids: Vec<String> = model.sensors().map(|s| s.id.clone()).collect();
    let mut alert_state: HashMap<String, bool> =
        sensor_ids.iter().map(|id| (id.clone(), false)).collect();

    for step in 0..args.steps {
        scenario::step(&mut model, step).with_context(|| format!("step {step}"))?;

        for track in model.tracks() {
            debug!(
                "step {step}: {} at ({:.4}, {:.4}) spread {:.0} m confidence {:.2}",
                track.id, track.position.lon, track.position.lat, track.spread_m, track.confidence
            );
        }

        for id in &sensor_ids {
            let alert = model.sensor_alert(id);
            let previous = alert_state.insert(id.clone(), alert).unwrap_or(false);
            if alert && !previous {
                warn!("step {step}: {id} ALERT - track in range");
            } else if !alert && previous {
                info!("step {step}: {id} clear");
            }
        }

        if step == scenario::WAYPOINT_STEP {
            info!("step {step}: waypoints saved for Alpha and Beta");
        }

        if args.interval_ms > 0 && step + 1 < args.steps {
            thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    for track in model.tracks() {
        info!(
            "final: {} at ({:.4}, {:.4}) after {} updates, {} waypoints",
            track.id,
            track.position.lon,
            track.position.lat,
            track.history.len() - 1,
            track.saved_waypoints.len()
        );
    }

    if args.json {
        let snapshot = model.snapshot();
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?
        );
    }

    Ok(())
}
