//! Staged collection of calibration samples.
//!
//! Each target is a stage started by an external trigger (the UI has shown
//! the target). A stage first discards `settle_frames` frames while the eyes
//! travel to the target, then accumulates `frames_per_target` frames with
//! open eyes. Closed-eye frames are skipped without counting because iris
//! landmarks are unreliable mid-blink.

use super::{CalibrationSample, ScreenPoint};
use crate::features::GazeFeatures;
use log::{debug, info};

/// Features collected for one target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBatch {
    /// Screen target
    pub target: ScreenPoint,
    /// Frames collected while looking at it
    pub features: Vec<GazeFeatures>,
}

impl TargetBatch {
    /// Collapse the batch to a single mean sample, `None` when empty
    pub fn reduce(&self) -> Option<CalibrationSample> {
        GazeFeatures::mean(&self.features).map(|features| CalibrationSample {
            features,
            target: self.target,
        })
    }
}

/// Targets on a `rows x cols` grid inset from the screen edges by `margin`
/// (a fraction of each dimension), ordered row by row.
pub fn grid_targets(rows: usize, cols: usize, margin: f64, width: f64, height: f64) -> Vec<ScreenPoint> {
    let axis = |count: usize, extent: f64| -> Vec<f64> {
        let lo = margin * extent;
        let hi = extent - lo;
        match count {
            0 => Vec::new(),
            1 => vec![extent / 2.0],
            n => (0..n).map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64).collect(),
        }
    };
    let xs = axis(cols, width);
    let ys = axis(rows, height);
    ys.iter()
        .flat_map(|&y| xs.iter().map(move |&x| ScreenPoint::new(x, y)))
        .collect()
}

/// Progress of the current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// Waiting for the external trigger to start the stage
    Idle {
        /// Index of the next target
        target_index: usize,
    },
    /// Discarding frames while the eyes settle
    Settling {
        /// Index of the current target
        target_index: usize,
        /// Settle frames still to discard
        remaining: usize,
    },
    /// Accumulating frames
    Collecting {
        /// Index of the current target
        target_index: usize,
        /// Frames collected so far
        collected: usize,
    },
    /// Every target has its batch
    Complete,
}

/// Calibration sample collector driven by the frame loop
pub struct CalibrationSession {
    targets: Vec<ScreenPoint>,
    settle_frames: usize,
    frames_per_target: usize,
    batches: Vec<TargetBatch>,
    status: StageStatus,
    buffer: Vec<GazeFeatures>,
}

impl CalibrationSession {
    /// Create a session over the given targets
    pub fn new(targets: Vec<ScreenPoint>, settle_frames: usize, frames_per_target: usize) -> Self {
        let status = if targets.is_empty() {
            StageStatus::Complete
        } else {
            StageStatus::Idle { target_index: 0 }
        };
        Self {
            batches: Vec::with_capacity(targets.len()),
            targets,
            settle_frames,
            frames_per_target: frames_per_target.max(1),
            status,
            buffer: Vec::with_capacity(frames_per_target),
        }
    }

    /// Start collecting for the next target.
    ///
    /// Ignored unless the session is idle between stages.
    pub fn begin_stage(&mut self) -> StageStatus {
        if let StageStatus::Idle { target_index } = self.status {
            debug!("Calibration stage {target_index} started");
            self.buffer.clear();
            self.status = if self.settle_frames > 0 {
                StageStatus::Settling {
                    target_index,
                    remaining: self.settle_frames,
                }
            } else {
                StageStatus::Collecting {
                    target_index,
                    collected: 0,
                }
            };
        }
        self.status
    }

    /// Offer one frame's features to the current stage
    pub fn push_frame(&mut self, features: &GazeFeatures, eyes_closed: bool) -> StageStatus {
        match self.status {
            StageStatus::Settling { target_index, remaining } => {
                self.status = if remaining > 1 {
                    StageStatus::Settling {
                        target_index,
                        remaining: remaining - 1,
                    }
                } else {
                    StageStatus::Collecting {
                        target_index,
                        collected: 0,
                    }
                };
            }
            StageStatus::Collecting { target_index, .. } if !eyes_closed => {
                self.buffer.push(*features);
                if self.buffer.len() >= self.frames_per_target {
                    self.finish_stage(target_index);
                } else {
                    self.status = StageStatus::Collecting {
                        target_index,
                        collected: self.buffer.len(),
                    };
                }
            }
            _ => {}
        }
        self.status
    }

    fn finish_stage(&mut self, target_index: usize) {
        self.batches.push(TargetBatch {
            target: self.targets[target_index],
            features: std::mem::take(&mut self.buffer),
        });
        let next = target_index + 1;
        self.status = if next < self.targets.len() {
            StageStatus::Idle { target_index: next }
        } else {
            info!("Calibration collection complete: {} targets", self.batches.len());
            StageStatus::Complete
        };
    }

    /// Current status
    pub fn status(&self) -> StageStatus {
        self.status
    }

    /// Target of the current or next stage
    pub fn current_target(&self) -> Option<ScreenPoint> {
        match self.status {
            StageStatus::Idle { target_index }
            | StageStatus::Settling { target_index, .. }
            | StageStatus::Collecting { target_index, .. } => self.targets.get(target_index).copied(),
            StageStatus::Complete => None,
        }
    }

    /// All targets in order
    pub fn targets(&self) -> &[ScreenPoint] {
        &self.targets
    }

    /// True once every target has a batch
    pub fn is_complete(&self) -> bool {
        matches!(self.status, StageStatus::Complete)
    }

    /// Batches collected so far
    pub fn batches(&self) -> &[TargetBatch] {
        &self.batches
    }

    /// Consume the session, returning its batches
    pub fn into_batches(self) -> Vec<TargetBatch> {
        self.batches
    }
}
