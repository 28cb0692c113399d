//! Configuration management for the gaze tracker

use crate::constants::MIN_CALIBRATION_SAMPLES;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tracker configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blink detection
    pub blink: BlinkConfig,

    /// Closure-select and freeze/recovery gating
    pub tracking: TrackingConfig,

    /// Calibration fit and sample collection
    pub calibration: CalibrationConfig,

    /// Prediction smoothing
    pub smoothing: SmoothingConfig,

    /// Target screen geometry
    pub screen: ScreenConfig,

    /// Detector input zoom
    pub zoom: ZoomConfig,
}

/// Blink detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// EAR below which an eye counts as closed
    pub ear_threshold: f64,

    /// Shortest closed run (frames) that counts as a blink
    pub min_frames: u32,

    /// Longest closed run (frames) that counts as a blink
    pub max_frames: u32,

    /// Maximum gap between two blinks forming a double blink (seconds)
    pub double_blink_window: f64,
}

/// Closure and freeze gating parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// EAR below which gaze updates freeze
    pub freeze_ear_threshold: f64,

    /// EAR below which a closure-select hold is timed
    pub closure_ear_threshold: f64,

    /// Frames still frozen after the eyes reopen
    pub recovery_frames: u32,

    /// Closure duration that fires a select (seconds)
    pub closure_select_duration: f64,
}

/// Calibration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Ridge penalty on the non-bias coefficients
    pub ridge_lambda: f64,

    /// Outlier threshold as a multiple of the median residual
    pub outlier_multiplier: f64,

    /// Minimum outlier threshold in pixels
    pub outlier_floor_px: f64,

    /// Calibration grid rows
    pub grid_rows: usize,

    /// Calibration grid columns
    pub grid_cols: usize,

    /// Grid inset from the screen edges, as a fraction of each dimension
    pub grid_margin: f64,

    /// Frames discarded at the start of each target while the eyes settle
    pub settle_frames: usize,

    /// Valid frames collected per target
    pub frames_per_target: usize,
}

/// Smoothing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Exponential moving average weight of the newest value
    pub ema_alpha: f64,

    /// Moving average window size
    pub moving_average_window: usize,

    /// Minimum movement (pixels) before the reported point updates
    pub dead_zone_px: f64,

    /// Scaling of predictions about the screen center
    pub sensitivity: f64,
}

/// Screen geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Width in pixels
    pub width: f64,

    /// Height in pixels
    pub height: f64,
}

/// Zoom parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Smallest zoom factor
    pub min: f64,

    /// Largest zoom factor
    pub max: f64,

    /// Zoom increment per step
    pub step: f64,

    /// Zoom factor at startup
    pub initial: f64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.20,
            min_frames: 1,
            max_frames: 8,
            double_blink_window: 0.5,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            freeze_ear_threshold: 0.22,
            closure_ear_threshold: 0.20,
            recovery_frames: 5,
            closure_select_duration: 2.0,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            ridge_lambda: 0.5,
            outlier_multiplier: 2.5,
            outlier_floor_px: 50.0,
            grid_rows: 4,
            grid_cols: 4,
            grid_margin: 0.1,
            settle_frames: 10,
            frames_per_target: 20,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.3,
            moving_average_window: 5,
            dead_zone_px: 15.0,
            sensitivity: 0.85,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl ScreenConfig {
    /// Geometric screen center
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 3.0,
            step: 0.25,
            initial: 1.0,
        }
    }
}

fn check(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::ConfigError(message.to_string()))
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid parameter
    pub fn validate(&self) -> Result<()> {
        let blink = &self.blink;
        check(
            blink.ear_threshold > 0.0 && blink.ear_threshold < 1.0,
            "Blink EAR threshold must be between 0.0 and 1.0",
        )?;
        check(blink.min_frames >= 1, "Blink min_frames must be at least 1")?;
        check(
            blink.min_frames <= blink.max_frames,
            "Blink min_frames must not exceed max_frames",
        )?;
        check(blink.double_blink_window > 0.0, "Double-blink window must be positive")?;

        let tracking = &self.tracking;
        check(
            tracking.freeze_ear_threshold > 0.0 && tracking.freeze_ear_threshold < 1.0,
            "Freeze EAR threshold must be between 0.0 and 1.0",
        )?;
        check(
            tracking.closure_ear_threshold > 0.0 && tracking.closure_ear_threshold < 1.0,
            "Closure EAR threshold must be between 0.0 and 1.0",
        )?;
        check(
            tracking.closure_select_duration > 0.0,
            "Closure-select duration must be positive",
        )?;

        let calibration = &self.calibration;
        check(calibration.ridge_lambda >= 0.0, "Ridge lambda must be non-negative")?;
        check(calibration.outlier_multiplier > 0.0, "Outlier multiplier must be positive")?;
        check(calibration.outlier_floor_px >= 0.0, "Outlier floor must be non-negative")?;
        check(
            calibration.grid_rows * calibration.grid_cols >= MIN_CALIBRATION_SAMPLES,
            "Calibration grid must contain at least 10 targets",
        )?;
        check(
            (0.0..0.5).contains(&calibration.grid_margin),
            "Grid margin must be in [0.0, 0.5)",
        )?;
        check(calibration.frames_per_target > 0, "Frames per target must be greater than 0")?;

        let smoothing = &self.smoothing;
        check(
            smoothing.ema_alpha > 0.0 && smoothing.ema_alpha <= 1.0,
            "EMA alpha must be in (0, 1]",
        )?;
        check(
            smoothing.moving_average_window > 0,
            "Moving average window size must be greater than 0",
        )?;
        check(smoothing.dead_zone_px >= 0.0, "Dead zone must be non-negative")?;
        check(smoothing.sensitivity > 0.0, "Sensitivity must be positive")?;

        check(
            self.screen.width > 0.0 && self.screen.height > 0.0,
            "Screen dimensions must be positive",
        )?;

        let zoom = &self.zoom;
        check(
            zoom.min.is_finite() && zoom.max.is_finite() && zoom.initial.is_finite(),
            "Zoom levels must be finite",
        )?;
        check(zoom.min >= 1.0, "Zoom minimum must be at least 1.0")?;
        check(zoom.min <= zoom.max, "Zoom minimum must not exceed maximum")?;
        check(zoom.step > 0.0, "Zoom step must be positive")?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Gaze Tracking Configuration

# Blink detection
blink:
  ear_threshold: 0.20
  min_frames: 1
  max_frames: 8
  double_blink_window: 0.5

# Closure-select and freeze/recovery gating
tracking:
  freeze_ear_threshold: 0.22
  closure_ear_threshold: 0.20
  recovery_frames: 5
  closure_select_duration: 2.0

# Calibration
calibration:
  ridge_lambda: 0.5
  outlier_multiplier: 2.5
  outlier_floor_px: 50.0
  grid_rows: 4
  grid_cols: 4
  grid_margin: 0.1
  settle_frames: 10
  frames_per_target: 20

# Prediction smoothing
smoothing:
  ema_alpha: 0.3
  moving_average_window: 5
  dead_zone_px: 15.0
  sensitivity: 0.85

# Screen geometry
screen:
  width: 1920.0
  height: 1080.0

# Detector input zoom
zoom:
  min: 1.0
  max: 3.0
  step: 0.25
  initial: 1.0
"#;
