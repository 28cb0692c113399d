//! Calibration: mapping gaze features to screen coordinates.
//!
//! A calibration fits two independent ridge regressions (one per screen
//! axis) over an 11-term polynomial expansion of the gaze features, prunes
//! samples with outsized residuals, and refits on the survivors. The fitted
//! model replaces any previous one wholesale; a failed calibration leaves
//! the previous model untouched.

/// Fit quality report
pub mod diagnostics;

/// Feature expansion, normalization and the ridge solver
pub mod regression;

/// Staged sample collection over a target grid
pub mod session;

use crate::config::CalibrationConfig;
use crate::constants::{MIN_CALIBRATION_SAMPLES, POLY_FEATURES};
use crate::features::GazeFeatures;
use crate::{Error, Result};
use diagnostics::CalibrationDiagnostics;
use log::{debug, info, warn};
use regression::{expand_features, fit_ridge, FeatureVector, Normalization};
use serde::{Deserialize, Serialize};
use session::TargetBatch;

/// A point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Clamp into `[0, width] x [0, height]`
    pub fn clamp_to(&self, width: f64, height: f64) -> Self {
        Self::new(self.x.clamp(0.0, width), self.y.clamp(0.0, height))
    }
}

/// Features observed while the user looked at a known target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSample {
    /// Observed features
    pub features: GazeFeatures,
    /// Target the user was looking at
    pub target: ScreenPoint,
}

impl CalibrationSample {
    /// True when every feature and both target coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.target.x.is_finite()
            && self.target.y.is_finite()
            && self.features.to_array().iter().all(|v| v.is_finite())
    }
}

/// Fitted per-axis linear model over normalized polynomial features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionModel {
    /// Horizontal axis weights
    pub coeffs_x: FeatureVector,
    /// Vertical axis weights
    pub coeffs_y: FeatureVector,
    /// Column means (index 0 unused)
    pub mean: FeatureVector,
    /// Column standard deviations (index 0 unused)
    pub std: FeatureVector,
}

impl RegressionModel {
    fn fit(samples: &[&CalibrationSample], lambda: f64) -> Result<Self> {
        let raw: Vec<FeatureVector> = samples.iter().map(|s| expand_features(&s.features)).collect();
        let norm = Normalization::fit(&raw);
        let rows: Vec<FeatureVector> = raw.iter().map(|r| norm.apply(r)).collect();
        let xs: Vec<f64> = samples.iter().map(|s| s.target.x).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.target.y).collect();

        Ok(Self {
            coeffs_x: fit_ridge(&rows, &xs, lambda)?,
            coeffs_y: fit_ridge(&rows, &ys, lambda)?,
            mean: norm.mean,
            std: norm.std,
        })
    }

    /// Stored normalization
    pub fn normalization(&self) -> Normalization {
        Normalization {
            mean: self.mean,
            std: self.std,
        }
    }

    /// Unsmoothed, unclamped screen prediction
    pub fn predict_raw(&self, features: &GazeFeatures) -> ScreenPoint {
        let row = self.normalization().apply(&expand_features(features));
        let dot = |w: &FeatureVector| (0..POLY_FEATURES).map(|i| row[i] * w[i]).sum::<f64>();
        ScreenPoint::new(dot(&self.coeffs_x), dot(&self.coeffs_y))
    }
}

/// Whether a model is available
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CalibrationState {
    /// No successful calibration yet
    #[default]
    Uncalibrated,
    /// A fitted model
    Calibrated(RegressionModel),
}

impl CalibrationState {
    /// Fitted model, if any
    pub fn model(&self) -> Option<&RegressionModel> {
        match self {
            Self::Uncalibrated => None,
            Self::Calibrated(model) => Some(model),
        }
    }

    /// True once a calibration has succeeded
    pub fn is_calibrated(&self) -> bool {
        matches!(self, Self::Calibrated(_))
    }
}

/// Indices of samples to keep after outlier rejection.
///
/// Returns `None` when nothing is pruned or when pruning would leave fewer
/// than `min_keep` samples; the caller then keeps the original fit.
pub fn select_inliers(residuals: &[f64], multiplier: f64, floor_px: f64, min_keep: usize) -> Option<Vec<usize>> {
    let m = median(residuals)?;
    let threshold = (multiplier * m).max(floor_px);
    let keep: Vec<usize> = residuals
        .iter()
        .enumerate()
        .filter(|&(_, &r)| r <= threshold)
        .map(|(i, _)| i)
        .collect();

    if keep.len() == residuals.len() || keep.len() < min_keep {
        None
    } else {
        Some(keep)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

/// Fits and owns the regression model
pub struct CalibrationEngine {
    config: CalibrationConfig,
    state: CalibrationState,
    diagnostics: Option<CalibrationDiagnostics>,
}

impl CalibrationEngine {
    /// Create an uncalibrated engine
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            state: CalibrationState::Uncalibrated,
            diagnostics: None,
        }
    }

    /// Fit a new model from ordered samples.
    ///
    /// On success the model and diagnostics are replaced together.
    ///
    /// # Errors
    ///
    /// Returns `Error::InsufficientSamples` for fewer than 10 samples,
    /// `Error::InvalidInput` when a sample holds a NaN or infinite value and
    /// `Error::SingularRegression` when the normal equations cannot be
    /// solved; the previous model is kept in every case
    pub fn calibrate(&mut self, samples: &[CalibrationSample]) -> Result<&CalibrationDiagnostics> {
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            warn!("Calibration rejected: sample {index} is not finite");
            return Err(Error::InvalidInput(format!(
                "calibration sample {index} contains a non-finite value"
            )));
        }

        if samples.len() < MIN_CALIBRATION_SAMPLES {
            warn!(
                "Calibration rejected: {} samples, {MIN_CALIBRATION_SAMPLES} required",
                samples.len()
            );
            return Err(Error::InsufficientSamples {
                required: MIN_CALIBRATION_SAMPLES,
                provided: samples.len(),
            });
        }

        let lambda = self.config.ridge_lambda;
        let all: Vec<usize> = (0..samples.len()).collect();
        let all_refs: Vec<&CalibrationSample> = samples.iter().collect();
        let first = RegressionModel::fit(&all_refs, lambda).map_err(|e| {
            warn!("Calibration rejected: {e}");
            e
        })?;

        let residuals: Vec<f64> = samples
            .iter()
            .map(|s| first.predict_raw(&s.features).distance(&s.target))
            .collect();

        let (model, used) = match select_inliers(
            &residuals,
            self.config.outlier_multiplier,
            self.config.outlier_floor_px,
            MIN_CALIBRATION_SAMPLES,
        ) {
            Some(keep) => {
                let kept_refs: Vec<&CalibrationSample> = keep.iter().map(|&i| &samples[i]).collect();
                match RegressionModel::fit(&kept_refs, lambda) {
                    Ok(refit) => {
                        info!("Removed {} calibration outliers", samples.len() - keep.len());
                        (refit, keep)
                    }
                    Err(e) => {
                        warn!("Refit after outlier removal failed ({e}), keeping full fit");
                        (first, all)
                    }
                }
            }
            None => (first, all),
        };

        let diagnostics = CalibrationDiagnostics::compute(&model, samples, &used);
        info!("Calibration complete: {}", diagnostics.summary());
        for r in &diagnostics.residuals {
            debug!(
                "  sample {:>3}: target ({:.0}, {:.0}) predicted ({:.0}, {:.0}) error {:.1}px{}",
                r.index,
                r.target.x,
                r.target.y,
                r.predicted.x,
                r.predicted.y,
                r.error_px,
                if r.outlier { " (outlier)" } else { "" }
            );
        }

        self.state = CalibrationState::Calibrated(model);
        Ok(self.diagnostics.insert(diagnostics))
    }

    /// Reduce each target's batch to its mean features and calibrate
    ///
    /// # Errors
    ///
    /// Same as [`CalibrationEngine::calibrate`]; empty batches are skipped
    pub fn calibrate_batches(&mut self, batches: &[TargetBatch]) -> Result<&CalibrationDiagnostics> {
        let samples: Vec<CalibrationSample> = batches.iter().filter_map(TargetBatch::reduce).collect();
        if samples.len() < batches.len() {
            warn!("Skipped {} empty calibration batches", batches.len() - samples.len());
        }
        self.calibrate(&samples)
    }

    /// Current calibration state
    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// Fitted model, if any
    pub fn model(&self) -> Option<&RegressionModel> {
        self.state.model()
    }

    /// Diagnostics of the last successful calibration
    pub fn diagnostics(&self) -> Option<&CalibrationDiagnostics> {
        self.diagnostics.as_ref()
    }

    /// Configuration in use
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Forget the model
    pub fn reset(&mut self) {
        self.state = CalibrationState::Uncalibrated;
        self.diagnostics = None;
    }
}
