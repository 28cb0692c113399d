//! Per-frame orchestration of feature extraction, blink and closure
//! detection, freeze/recovery gating, calibration collection and gaze
//! prediction.
//!
//! [`GazeTracker`] is the single owner of every piece of mutable tracking
//! state and is driven synchronously by the frame loop.

/// Closure timing and closure-select
pub mod closure;

/// Frame rate estimate
pub mod fps;

/// Freeze/recovery gate
pub mod freeze;

/// Detector input zoom
pub mod zoom;

use crate::blink::BlinkDetector;
use crate::calibration::{
    diagnostics::CalibrationDiagnostics,
    session::{grid_targets, CalibrationSession, StageStatus, TargetBatch},
    CalibrationEngine, CalibrationSample, CalibrationState, ScreenPoint,
};
use crate::config::Config;
use crate::features::{extract_features, eye_aspect_ratio, GazeFeatures};
use crate::landmarks::LandmarkFrame;
use crate::predictor::GazePredictor;
use crate::{Error, Result};
use closure::ClosureDetector;
use fps::FpsEstimator;
use freeze::{FreezeGate, GateDecision};
use log::{debug, info, warn};
use zoom::Zoom;

/// Everything the UI needs about one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Frame timestamp in seconds
    pub timestamp: f64,
    /// A face was detected
    pub face_detected: bool,
    /// Eye aspect ratio (0 when no face)
    pub ear: f64,
    /// Blinks registered so far
    pub blink_count: u64,
    /// Double blink completed on this frame
    pub double_blink: bool,
    /// Extracted features (absent when no face)
    pub features: Option<GazeFeatures>,
    /// Reported gaze point, held while frozen or when no face is visible
    pub gaze: Option<ScreenPoint>,
    /// `gaze` reflects a current, calibrated prediction
    pub gaze_valid: bool,
    /// Gaze updates are frozen by eye closure or recovery
    pub frozen: bool,
    /// Smoothed frame rate
    pub fps: f64,
    /// Eyes closed for closure-select purposes
    pub eyes_closed: bool,
    /// Seconds of the current closure
    pub closure_duration: f64,
    /// Closure-select fired on this frame
    pub closure_select: bool,
    /// Detector zoom factor
    pub zoom: f64,
    /// Calibration collection progress, if a session is running
    pub calibration: Option<StageStatus>,
}

/// Owns the tracking pipeline
pub struct GazeTracker {
    config: Config,
    blink: BlinkDetector,
    closure: ClosureDetector,
    gate: FreezeGate,
    calibration: CalibrationEngine,
    predictor: GazePredictor,
    zoom: Zoom,
    fps: FpsEstimator,
    session: Option<CalibrationSession>,
    held_gaze: Option<ScreenPoint>,
}

impl GazeTracker {
    /// Create a tracker from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        info!(
            "Gaze tracker for {}x{} screen, freeze EAR {:.2}, blink EAR {:.2}",
            config.screen.width, config.screen.height, config.tracking.freeze_ear_threshold, config.blink.ear_threshold
        );

        Ok(Self {
            blink: BlinkDetector::new(config.blink.clone()),
            closure: ClosureDetector::new(
                config.tracking.closure_ear_threshold,
                config.tracking.closure_select_duration,
            ),
            gate: FreezeGate::new(config.tracking.freeze_ear_threshold, config.tracking.recovery_frames),
            calibration: CalibrationEngine::new(config.calibration.clone()),
            predictor: GazePredictor::new(&config.smoothing, config.screen.clone()),
            zoom: Zoom::new(config.zoom.clone()),
            fps: FpsEstimator::new(),
            session: None,
            held_gaze: None,
            config,
        })
    }

    /// Process one frame
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameSnapshot {
        let fps = self.fps.update(frame.timestamp);

        let Ok(face) = frame.face() else {
            return FrameSnapshot {
                timestamp: frame.timestamp,
                face_detected: false,
                ear: 0.0,
                blink_count: self.blink.blink_count(),
                double_blink: false,
                features: None,
                gaze: self.held_gaze,
                gaze_valid: false,
                frozen: self.gate.is_frozen(),
                fps,
                eyes_closed: self.closure.is_closed(),
                closure_duration: 0.0,
                closure_select: false,
                zoom: self.zoom.level(),
                calibration: self.session.as_ref().map(CalibrationSession::status),
            };
        };

        let features = extract_features(face);
        let ear = eye_aspect_ratio(face);
        let blink = self.blink.update(ear, frame.timestamp);
        let closure = self.closure.update(ear, frame.timestamp);
        let decision = self.gate.update(ear);

        let calibration = self
            .session
            .as_mut()
            .map(|session| session.push_frame(&features, decision == GateDecision::Hold));

        let gaze_valid = match decision {
            GateDecision::Hold => self.held_gaze.is_some() && self.calibration.state().is_calibrated(),
            GateDecision::Resume => {
                debug!("Gaze resumed at {:.3}s, smoothing reset", frame.timestamp);
                self.predictor.reset_smoothing();
                self.predict(&features)
            }
            GateDecision::Predict => self.predict(&features),
        };

        FrameSnapshot {
            timestamp: frame.timestamp,
            face_detected: true,
            ear,
            blink_count: blink.blink_count,
            double_blink: blink.double_blink,
            features: Some(features),
            gaze: self.held_gaze,
            gaze_valid,
            frozen: decision == GateDecision::Hold,
            fps,
            eyes_closed: closure.closed,
            closure_duration: closure.duration,
            closure_select: closure.select,
            zoom: self.zoom.level(),
            calibration,
        }
    }

    fn predict(&mut self, features: &GazeFeatures) -> bool {
        match self.predictor.predict(features, self.calibration.state()) {
            Ok(point) => {
                self.held_gaze = Some(point);
                true
            }
            Err(_) => false,
        }
    }

    /// Fit a model from samples; smoothing restarts on success
    ///
    /// # Errors
    ///
    /// See [`CalibrationEngine::calibrate`]; the previous model is kept on failure
    pub fn calibrate(&mut self, samples: &[CalibrationSample]) -> Result<()> {
        self.calibration.calibrate(samples)?;
        self.on_recalibrated();
        Ok(())
    }

    /// Fit a model from per-target batches; smoothing restarts on success
    ///
    /// # Errors
    ///
    /// See [`CalibrationEngine::calibrate_batches`]
    pub fn calibrate_batches(&mut self, batches: &[TargetBatch]) -> Result<()> {
        self.calibration.calibrate_batches(batches)?;
        self.on_recalibrated();
        Ok(())
    }

    fn on_recalibrated(&mut self) {
        self.predictor.reset_smoothing();
        self.held_gaze = None;
    }

    /// Start collecting samples over the configured target grid
    pub fn start_calibration(&mut self) -> &[ScreenPoint] {
        let c = &self.config.calibration;
        let targets = grid_targets(
            c.grid_rows,
            c.grid_cols,
            c.grid_margin,
            self.config.screen.width,
            self.config.screen.height,
        );
        info!("Calibration started with {} targets", targets.len());
        self.session
            .insert(CalibrationSession::new(targets, c.settle_frames, c.frames_per_target))
            .targets()
    }

    /// Start the next calibration stage (target shown to the user)
    pub fn begin_calibration_stage(&mut self) -> Option<StageStatus> {
        self.session.as_mut().map(CalibrationSession::begin_stage)
    }

    /// Target the user should currently be looking at
    pub fn calibration_target(&self) -> Option<ScreenPoint> {
        self.session.as_ref().and_then(CalibrationSession::current_target)
    }

    /// Fit a model from the batches collected so far and end the session
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when no session is running, otherwise
    /// the calibration error; the session ends either way
    pub fn finish_calibration(&mut self) -> Result<()> {
        let session = self
            .session
            .take()
            .ok_or_else(|| Error::InvalidInput("No calibration session in progress".to_string()))?;
        if !session.is_complete() {
            warn!(
                "Finishing calibration early with {}/{} targets",
                session.batches().len(),
                session.targets().len()
            );
        }
        self.calibrate_batches(&session.into_batches())
    }

    /// Abandon the running session without touching the model
    pub fn cancel_calibration(&mut self) {
        if self.session.take().is_some() {
            info!("Calibration cancelled");
        }
    }

    /// Current calibration state
    pub fn calibration_state(&self) -> &CalibrationState {
        self.calibration.state()
    }

    /// Diagnostics of the last successful calibration
    pub fn diagnostics(&self) -> Option<&CalibrationDiagnostics> {
        self.calibration.diagnostics()
    }

    /// Blinks registered since creation
    pub fn blink_count(&self) -> u64 {
        self.blink.blink_count()
    }

    /// Detector zoom
    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    /// Mutable detector zoom
    pub fn zoom_mut(&mut self) -> &mut Zoom {
        &mut self.zoom
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }
}
