//! Sustained eye closure timing and closure-select events.

use log::info;

/// Closure state after one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosureOutput {
    /// Eyes currently closed
    pub closed: bool,
    /// Seconds since the current closure began (0 when open)
    pub duration: f64,
    /// True only on the frame the closure first reaches the select duration
    pub select: bool,
}

/// Times continuous closures and fires one select per closure
pub struct ClosureDetector {
    ear_threshold: f64,
    select_duration: f64,
    closed_since: Option<f64>,
    fired: bool,
}

impl ClosureDetector {
    /// Create a detector closing below `ear_threshold` and selecting after `select_duration` seconds
    pub fn new(ear_threshold: f64, select_duration: f64) -> Self {
        Self {
            ear_threshold,
            select_duration,
            closed_since: None,
            fired: false,
        }
    }

    /// Feed one frame's EAR
    pub fn update(&mut self, ear: f64, timestamp: f64) -> ClosureOutput {
        if ear >= self.ear_threshold {
            self.closed_since = None;
            return ClosureOutput {
                closed: false,
                duration: 0.0,
                select: false,
            };
        }

        let start = match self.closed_since {
            Some(start) => start,
            None => {
                self.closed_since = Some(timestamp);
                self.fired = false;
                timestamp
            }
        };
        let duration = timestamp - start;
        let select = !self.fired && duration >= self.select_duration;
        if select {
            self.fired = true;
            info!("Closure select after {duration:.2}s");
        }

        ClosureOutput {
            closed: true,
            duration,
            select,
        }
    }

    /// Eyes closed as of the last update
    pub fn is_closed(&self) -> bool {
        self.closed_since.is_some()
    }

    /// Forget any closure in progress
    pub fn reset(&mut self) {
        self.closed_since = None;
        self.fired = false;
    }
}
