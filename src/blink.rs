//! Blink and double-blink detection from the eye aspect ratio stream.

use crate::config::BlinkConfig;
use log::debug;
use std::collections::VecDeque;

/// Blink detector output for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkOutput {
    /// Eye aspect ratio of this frame
    pub ear: f64,
    /// Blinks registered since creation or reset
    pub blink_count: u64,
    /// True only on the frame completing a double blink
    pub double_blink: bool,
    /// EAR below the blink threshold on this frame
    pub eyes_closed: bool,
}

/// Counts blinks whose closed run falls inside a frame-count window and
/// reports pairs of blinks close in time as a double blink.
pub struct BlinkDetector {
    config: BlinkConfig,
    closed_frames: u32,
    blink_count: u64,
    history: VecDeque<f64>,
}

impl BlinkDetector {
    /// Create a new blink detector
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            config,
            closed_frames: 0,
            blink_count: 0,
            history: VecDeque::with_capacity(4),
        }
    }

    /// Feed one frame's EAR
    pub fn update(&mut self, ear: f64, timestamp: f64) -> BlinkOutput {
        let eyes_closed = ear < self.config.ear_threshold;
        let mut double_blink = false;

        if eyes_closed {
            self.closed_frames = self.closed_frames.saturating_add(1);
        } else if self.closed_frames > 0 {
            let run = self.closed_frames;
            self.closed_frames = 0;
            if (self.config.min_frames..=self.config.max_frames).contains(&run) {
                double_blink = self.register_blink(timestamp);
            } else {
                debug!("Discarded closed run of {run} frames");
            }
        }

        BlinkOutput {
            ear,
            blink_count: self.blink_count,
            double_blink,
            eyes_closed,
        }
    }

    /// Record a blink; returns true when it completes a double blink
    fn register_blink(&mut self, timestamp: f64) -> bool {
        self.blink_count += 1;
        let window = self.config.double_blink_window;

        self.history.push_back(timestamp);
        while self
            .history
            .front()
            .is_some_and(|&t| timestamp - t > 2.0 * window)
        {
            self.history.pop_front();
        }

        let n = self.history.len();
        if n >= 2 && self.history[n - 1] - self.history[n - 2] <= window {
            debug!("Double blink at {timestamp:.3}s");
            self.history.clear();
            return true;
        }
        false
    }

    /// Blinks registered so far
    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }

    /// Consecutive closed frames in the current run
    pub fn closed_frames(&self) -> u32 {
        self.closed_frames
    }

    /// Reset the detector
    pub fn reset(&mut self) {
        self.closed_frames = 0;
        self.blink_count = 0;
        self.history.clear();
    }
}
