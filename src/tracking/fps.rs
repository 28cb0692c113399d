use crate::constants::FPS_SMOOTHING;

/// Exponentially smoothed frame rate from frame timestamps
#[derive(Debug, Clone, Default)]
pub struct FpsEstimator {
    last_timestamp: Option<f64>,
    fps: f64,
}

impl FpsEstimator {
    /// Create an estimator with no history
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            fps: 0.0,
        }
    }

    /// Record a frame timestamp (seconds) and return the current estimate
    pub fn update(&mut self, timestamp: f64) -> f64 {
        if let Some(last) = self.last_timestamp {
            let dt = timestamp - last;
            if dt > 0.0 {
                let instant = 1.0 / dt;
                self.fps = if self.fps > 0.0 {
                    self.fps + FPS_SMOOTHING * (instant - self.fps)
                } else {
                    instant
                };
            }
        }
        self.last_timestamp = Some(timestamp);
        self.fps
    }

    /// Current estimate, 0 until two frames have been seen
    pub fn fps(&self) -> f64 {
        self.fps
    }
}
