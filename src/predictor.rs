//! Gaze point prediction from features and a calibrated model.
//!
//! Pipeline per frame: normalized polynomial features, linear prediction,
//! sensitivity scaling about the screen center, exponential smoothing,
//! moving average, dead zone, clamp to the screen.

use crate::calibration::{CalibrationState, ScreenPoint};
use crate::config::{ScreenConfig, SmoothingConfig};
use crate::features::GazeFeatures;
use crate::filters::{
    dead_zone::DeadZoneFilter, exponential::ExponentialFilter, moving_average::MovingAverageFilter,
    SmoothingFilter,
};
use crate::{Error, Result};

/// Turns per-frame features into a stable on-screen point
pub struct GazePredictor {
    screen: ScreenConfig,
    sensitivity: f64,
    stages: [Box<dyn SmoothingFilter>; 3],
    last_output: Option<ScreenPoint>,
}

impl GazePredictor {
    /// Create a predictor for the given screen
    ///
    /// # Panics
    ///
    /// Panics on an `ema_alpha` outside `(0, 1]`, a zero window or a negative
    /// dead zone; validate the configuration first
    pub fn new(smoothing: &SmoothingConfig, screen: ScreenConfig) -> Self {
        Self {
            screen,
            sensitivity: smoothing.sensitivity,
            stages: [
                Box::new(ExponentialFilter::new(smoothing.ema_alpha)),
                Box::new(MovingAverageFilter::new(smoothing.moving_average_window)),
                Box::new(DeadZoneFilter::new(smoothing.dead_zone_px)),
            ],
            last_output: None,
        }
    }

    /// Predict the smoothed, clamped gaze point
    ///
    /// # Errors
    ///
    /// Returns `Error::UncalibratedPrediction` when no model has been fitted
    pub fn predict(&mut self, features: &GazeFeatures, calibration: &CalibrationState) -> Result<ScreenPoint> {
        let model = calibration.model().ok_or(Error::UncalibratedPrediction)?;
        let raw = model.predict_raw(features);

        let (cx, cy) = self.screen.center();
        let mut point = (
            cx + (raw.x - cx) * self.sensitivity,
            cy + (raw.y - cy) * self.sensitivity,
        );
        for stage in &mut self.stages {
            point = stage.apply(point.0, point.1);
        }

        let output = ScreenPoint::new(point.0, point.1).clamp_to(self.screen.width, self.screen.height);
        self.last_output = Some(output);
        Ok(output)
    }

    /// Discard smoothing history; the next prediction starts fresh
    pub fn reset_smoothing(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
        self.last_output = None;
    }

    /// Last reported point since the most recent reset
    pub fn last_output(&self) -> Option<ScreenPoint> {
        self.last_output
    }

    /// Screen geometry
    pub fn screen(&self) -> &ScreenConfig {
        &self.screen
    }
}
