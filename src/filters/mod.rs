//! Smoothing filters applied to screen-space gaze predictions.
//!
//! The predictor chains an exponential moving average, a moving-average
//! window and a dead zone. Each stage implements [`SmoothingFilter`] so the
//! chain can be reset as a unit when gaze resumes after a freeze.

/// Exponential moving average
pub mod exponential;

/// Fixed-window moving average
pub mod moving_average;

/// Minimum-displacement hold
pub mod dead_zone;

use crate::{Error, Result};

/// Trait for all smoothing filters
pub trait SmoothingFilter: Send + Sync {
    /// Apply filter to input values
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes through values unchanged
pub struct NoFilter;

impl SmoothingFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, value: Option<&str>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{v}' for filter {filter_type}"))),
    }
}

/// Create a smoothing filter from a `name[:param]` description
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or out-of-range parameters
pub fn create_filter(description: &str) -> Result<Box<dyn SmoothingFilter>> {
    let lower = description.to_lowercase();
    let mut parts = lower.splitn(2, ':');
    let filter_type = parts.next().unwrap_or_default();
    let param = parts.next();

    match filter_type {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => {
            let alpha = parse_param(filter_type, param, 0.3)?;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialFilter::new(alpha)))
        }
        "moving_average" | "movingaverage" => {
            let window = parse_param(filter_type, param, 5usize)?;
            if window == 0 {
                return Err(Error::FilterError("Window size must be greater than 0".to_string()));
            }
            Ok(Box::new(moving_average::MovingAverageFilter::new(window)))
        }
        "dead_zone" | "deadzone" => {
            let threshold = parse_param(filter_type, param, 15.0)?;
            if !(threshold >= 0.0) {
                return Err(Error::FilterError(format!(
                    "Dead zone threshold must be non-negative, got {threshold}"
                )));
            }
            Ok(Box::new(dead_zone::DeadZoneFilter::new(threshold)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {description}"))),
    }
}
