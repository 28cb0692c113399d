//! Fit quality report produced once per successful calibration.
//!
//! Informational only: a poor report never blocks the model from being used.

use super::{CalibrationSample, RegressionModel, ScreenPoint};
use serde::Serialize;

/// Residual of one calibration sample under the final model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointResidual {
    /// Index of the sample in the calibration input
    pub index: usize,
    /// Screen target
    pub target: ScreenPoint,
    /// Model prediction (before smoothing and clamping)
    pub predicted: ScreenPoint,
    /// Euclidean error in pixels
    pub error_px: f64,
    /// Rejected before the final fit
    pub outlier: bool,
}

/// Calibration quality report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationDiagnostics {
    /// Samples supplied
    pub sample_count: usize,
    /// Samples used by the final fit
    pub samples_used: usize,
    /// Samples rejected as outliers
    pub outliers_removed: usize,
    /// Mean residual in pixels
    pub mean_error_px: f64,
    /// Largest residual in pixels
    pub max_error_px: f64,
    /// Coefficient of determination, horizontal axis
    pub r2_x: f64,
    /// Coefficient of determination, vertical axis
    pub r2_y: f64,
    /// Predicted horizontal span over target horizontal span
    pub coverage_x: f64,
    /// Predicted vertical span over target vertical span
    pub coverage_y: f64,
    /// Per-sample residuals of every input sample, outliers flagged
    pub residuals: Vec<PointResidual>,
}

impl CalibrationDiagnostics {
    /// Evaluate `model` on every input sample.
    ///
    /// `used` holds the indices the final fit was made from; error, R² and
    /// coverage figures cover those samples only.
    pub fn compute(model: &RegressionModel, samples: &[CalibrationSample], used: &[usize]) -> Self {
        let residuals: Vec<PointResidual> = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let predicted = model.predict_raw(&sample.features);
                PointResidual {
                    index,
                    target: sample.target,
                    predicted,
                    error_px: predicted.distance(&sample.target),
                    outlier: !used.contains(&index),
                }
            })
            .collect();

        let inliers: Vec<&PointResidual> = residuals.iter().filter(|r| !r.outlier).collect();
        let n = inliers.len().max(1) as f64;
        let mean_error_px = inliers.iter().map(|r| r.error_px).sum::<f64>() / n;
        let max_error_px = inliers.iter().map(|r| r.error_px).fold(0.0, f64::max);

        let tx: Vec<f64> = inliers.iter().map(|r| r.target.x).collect();
        let ty: Vec<f64> = inliers.iter().map(|r| r.target.y).collect();
        let px: Vec<f64> = inliers.iter().map(|r| r.predicted.x).collect();
        let py: Vec<f64> = inliers.iter().map(|r| r.predicted.y).collect();

        Self {
            sample_count: samples.len(),
            samples_used: inliers.len(),
            outliers_removed: samples.len() - inliers.len(),
            mean_error_px,
            max_error_px,
            r2_x: r_squared(&tx, &px),
            r2_y: r_squared(&ty, &py),
            coverage_x: coverage(&tx, &px),
            coverage_y: coverage(&ty, &py),
            residuals,
        }
    }

    /// Residuals of the samples rejected as outliers
    pub fn outliers(&self) -> impl Iterator<Item = &PointResidual> {
        self.residuals.iter().filter(|r| r.outlier)
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{}/{} samples, mean error {:.1}px, max {:.1}px, R² x={:.3} y={:.3}, coverage x={:.2} y={:.2}",
            self.samples_used,
            self.sample_count,
            self.mean_error_px,
            self.max_error_px,
            self.r2_x,
            self.r2_y,
            self.coverage_x,
            self.coverage_y
        )
    }
}

fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    }
}

fn span(values: &[f64]) -> f64 {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max >= min {
        max - min
    } else {
        0.0
    }
}

fn coverage(targets: &[f64], predicted: &[f64]) -> f64 {
    let target_span = span(targets);
    if target_span > 0.0 {
        span(predicted) / target_span
    } else {
        0.0
    }
}
