//! Gaze tracking replay tool: calibrates from recorded samples and replays
//! recorded landmark traces through the tracker.

use anyhow::Result;
use clap::Parser;
use gaze_tracking::{
    app::{FrameLoop, TraceSource},
    calibration::CalibrationSample,
    config::{Config, EXAMPLE_CONFIG},
    tracking::GazeTracker,
};
use log::{info, warn};
use std::sync::atomic::AtomicBool;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark frames to replay (YAML)
    #[arg(short, long)]
    trace: Option<String>,

    /// Recorded calibration samples (YAML list of features and targets)
    #[arg(short, long)]
    samples: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Write calibration diagnostics to this file (YAML)
    #[arg(long)]
    diagnostics_out: Option<String>,

    /// Detector zoom factor
    #[arg(short, long)]
    zoom: Option<f64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Gaze Tracking Replay");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let mut tracker = GazeTracker::new(config)?;
    if let Some(level) = args.zoom {
        let applied = tracker.zoom_mut().set(level);
        info!("Zoom set to {:.2}", applied);
    }

    if let Some(samples_path) = &args.samples {
        info!("Loading calibration samples from: {}", samples_path);
        let content = std::fs::read_to_string(samples_path)?;
        let samples: Vec<CalibrationSample> = serde_yaml::from_str(&content)?;
        match tracker.calibrate(&samples) {
            Ok(()) => {
                if let (Some(out), Some(diagnostics)) = (&args.diagnostics_out, tracker.diagnostics()) {
                    std::fs::write(out, serde_yaml::to_string(diagnostics)?)?;
                    info!("Calibration diagnostics written to: {}", out);
                }
            }
            Err(e) => warn!("Calibration rejected: {}", e),
        }
    }

    let Some(trace_path) = &args.trace else {
        if args.samples.is_none() {
            warn!("Nothing to do: pass --trace and/or --samples");
        }
        return Ok(());
    };

    info!("Replaying trace: {}", trace_path);
    let mut source = TraceSource::from_file(trace_path)?;
    let mut app = FrameLoop::new(tracker);
    let cancel = AtomicBool::new(false);
    let summary = app.run_with(&mut source, &cancel, |snapshot| {
        if snapshot.closure_select {
            info!("Closure select at {:.3}s, gaze {:?}", snapshot.timestamp, snapshot.gaze);
        }
    })?;

    println!(
        "frames={} faces={} blinks={} double_blinks={} selects={}",
        summary.frames, summary.face_frames, summary.blinks, summary.double_blinks, summary.closure_selects
    );
    if let Some(gaze) = summary.last_gaze {
        println!("last_gaze=({:.1}, {:.1})", gaze.x, gaze.y);
    }

    Ok(())
}
