//! Gaze tracking library for landmark-based gaze estimation.
//!
//! This library turns per-frame face landmarks into a stable on-screen gaze
//! point using:
//! - Iris, head and eyelid features extracted from the face mesh
//! - A per-user ridge regression calibrated against known screen targets
//! - A smoothing chain (exponential average, moving average, dead zone)
//!
//! The tracking pipeline consists of:
//! 1. Feature extraction and eye aspect ratio from the landmarks
//! 2. Blink and double-blink detection
//! 3. Closure timing with closure-select, and a freeze/recovery gate
//! 4. Gaze prediction from the calibrated model when the gate allows
//!
//! # Examples
//!
//! ## Calibrating and Predicting
//!
//! ```no_run
//! use gaze_tracking::{
//!     calibration::{CalibrationEngine, CalibrationSample, ScreenPoint},
//!     config::Config,
//!     features::GazeFeatures,
//!     predictor::GazePredictor,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut engine = CalibrationEngine::new(config.calibration.clone());
//!
//! // One sample per target the user looked at
//! let samples: Vec<CalibrationSample> = (0..16)
//!     .map(|i| {
//!         let (col, row) = (f64::from(i % 4), f64::from(i / 4));
//!         let mut features = GazeFeatures::default();
//!         features.rx = 0.35 + 0.1 * col;
//!         features.ry = -0.02 + 0.01 * row;
//!         CalibrationSample {
//!             features,
//!             target: ScreenPoint::new(200.0 + 500.0 * col, 150.0 + 250.0 * row),
//!         }
//!     })
//!     .collect();
//!
//! let diagnostics = engine.calibrate(&samples)?;
//! println!("{}", diagnostics.summary());
//!
//! let mut predictor = GazePredictor::new(&config.smoothing, config.screen.clone());
//! let point = predictor.predict(&samples[5].features, engine.state())?;
//! println!("Gaze at ({:.0}, {:.0})", point.x, point.y);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Filters
//!
//! ```no_run
//! use gaze_tracking::filters::{create_filter, SmoothingFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an exponential filter with alpha 0.3
//! let mut filter = create_filter("exponential:0.3")?;
//!
//! let filtered = filter.apply(960.0, 540.0);
//! println!("Filtered - x: {:.1}, y: {:.1}", filtered.0, filtered.1);
//!
//! // Reset filter if needed
//! filter.reset();
//! # Ok(())
//! # }
//! ```
//!
//! ## Blink Detection
//!
//! ```no_run
//! use gaze_tracking::{blink::BlinkDetector, config::BlinkConfig};
//!
//! # fn main() {
//! let mut detector = BlinkDetector::new(BlinkConfig::default());
//!
//! for (i, ear) in [0.30, 0.12, 0.10, 0.31].into_iter().enumerate() {
//!     let out = detector.update(ear, i as f64 / 30.0);
//!     if out.double_blink {
//!         println!("Double blink");
//!     }
//! }
//! println!("Blinks: {}", detector.blink_count());
//! # }
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use gaze_tracking::{
//!     app::{FrameLoop, TraceSource},
//!     config::Config,
//!     tracking::GazeTracker,
//! };
//! use std::sync::atomic::AtomicBool;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = GazeTracker::new(Config::from_file("gaze.yaml")?)?;
//! let mut app = FrameLoop::new(tracker);
//! let mut source = TraceSource::from_file("trace.yaml")?;
//!
//! let cancel = AtomicBool::new(false);
//! let summary = app.run_with(&mut source, &cancel, |snapshot| {
//!     if snapshot.closure_select {
//!         println!("Select at {:?}", snapshot.gaze);
//!     }
//! })?;
//! println!("{} frames, {} blinks", summary.frames, summary.blinks);
//! # Ok(())
//! # }
//! ```

/// Landmark frames and point geometry
pub mod landmarks;

/// Gaze feature extraction and eye aspect ratio
pub mod features;

/// Blink and double-blink detection
pub mod blink;

/// Ridge regression calibration, diagnostics and sample collection
pub mod calibration;

/// Signal filtering algorithms for smoothing gaze predictions
pub mod filters;

/// Calibrated, smoothed gaze point prediction
pub mod predictor;

/// Per-frame tracking state machine
pub mod tracking;

/// Error types and result handling
pub mod error;

/// Frame loop and landmark sources
pub mod app;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
