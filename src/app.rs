//! Frame loop driving the tracker from an external landmark source.

use crate::{
    calibration::ScreenPoint,
    error::Result,
    landmarks::LandmarkFrame,
    tracking::{zoom::CropRegion, FrameSnapshot, GazeTracker},
};
use log::{debug, info};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Boundary to the external face landmark detector
///
/// Implementations receive the crop requested by the current zoom level and
/// return landmarks normalized to that crop.
pub trait LandmarkSource {
    /// Next frame, `None` when the source is exhausted
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying detector or input fails
    fn next_frame(&mut self, crop: &CropRegion) -> Result<Option<LandmarkFrame>>;
}

/// Recorded landmark frames replayed in order
///
/// Recorded frames are already detector output, so the requested crop is
/// not applied again.
pub struct TraceSource {
    frames: VecDeque<LandmarkFrame>,
}

impl TraceSource {
    /// Wrap frames already in memory
    pub fn from_frames(frames: Vec<LandmarkFrame>) -> Self {
        Self { frames: frames.into() }
    }

    /// Parse a YAML list of frames
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a face has too few landmarks
    pub fn from_yaml(content: &str) -> Result<Self> {
        let frames: Vec<LandmarkFrame> = serde_yaml::from_str(content)?;
        Ok(Self::from_frames(frames))
    }

    /// Load a YAML trace file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Frames left to replay
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for TraceSource {
    fn next_frame(&mut self, _crop: &CropRegion) -> Result<Option<LandmarkFrame>> {
        Ok(self.frames.pop_front())
    }
}

/// Counters gathered over one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Frames processed
    pub frames: u64,
    /// Frames with a detected face
    pub face_frames: u64,
    /// Blinks registered
    pub blinks: u64,
    /// Double blinks completed
    pub double_blinks: u64,
    /// Closure-select events
    pub closure_selects: u64,
    /// Last reported gaze point
    pub last_gaze: Option<ScreenPoint>,
    /// Stopped by the cancel flag rather than source exhaustion
    pub cancelled: bool,
}

/// Pulls frames from a source and feeds the tracker
pub struct FrameLoop {
    tracker: GazeTracker,
}

impl FrameLoop {
    /// Create a loop around a tracker
    pub fn new(tracker: GazeTracker) -> Self {
        Self { tracker }
    }

    /// Run until the source is exhausted or `cancel` is set
    ///
    /// # Errors
    ///
    /// Returns the first source error
    pub fn run(&mut self, source: &mut dyn LandmarkSource, cancel: &AtomicBool) -> Result<RunSummary> {
        self.run_with(source, cancel, |_| {})
    }

    /// Like [`FrameLoop::run`], handing every snapshot to `on_frame`
    ///
    /// # Errors
    ///
    /// Returns the first source error
    pub fn run_with<F>(&mut self, source: &mut dyn LandmarkSource, cancel: &AtomicBool, mut on_frame: F) -> Result<RunSummary>
    where
        F: FnMut(&FrameSnapshot),
    {
        info!("Starting frame loop");
        let mut summary = RunSummary::default();
        let start_blinks = self.tracker.blink_count();

        loop {
            if cancel.load(Ordering::Relaxed) {
                info!("Frame loop cancelled after {} frames", summary.frames);
                summary.cancelled = true;
                break;
            }

            let Some(snapshot) = self.step(source)? else {
                info!("Landmark source exhausted");
                break;
            };

            summary.frames += 1;
            if snapshot.face_detected {
                summary.face_frames += 1;
            }
            if snapshot.double_blink {
                summary.double_blinks += 1;
                info!("Double blink at {:.3}s", snapshot.timestamp);
            }
            if snapshot.closure_select {
                summary.closure_selects += 1;
            }
            summary.blinks = snapshot.blink_count.saturating_sub(start_blinks);
            if snapshot.gaze.is_some() {
                summary.last_gaze = snapshot.gaze;
            }

            on_frame(&snapshot);
        }

        info!(
            "Frame loop finished: {} frames, {} blinks, {} double blinks, {} selects",
            summary.frames, summary.blinks, summary.double_blinks, summary.closure_selects
        );
        Ok(summary)
    }

    /// Process a single frame from the source
    ///
    /// # Errors
    ///
    /// Returns the source error, if any
    pub fn step(&mut self, source: &mut dyn LandmarkSource) -> Result<Option<FrameSnapshot>> {
        let crop = self.tracker.zoom().crop_region();
        let Some(mut frame) = source.next_frame(&crop)? else {
            return Ok(None);
        };

        if crop != CropRegion::FULL {
            frame.landmarks = frame.landmarks.map(|face| crop.map_landmarks(&face));
        }

        let snapshot = self.tracker.process(&frame);
        if !snapshot.face_detected {
            debug!("No face at {:.3}s", snapshot.timestamp);
        }
        debug!(
            "t={:.3}s ear={:.3} gaze={:?} valid={} frozen={} fps={:.1}",
            snapshot.timestamp, snapshot.ear, snapshot.gaze, snapshot.gaze_valid, snapshot.frozen, snapshot.fps
        );
        Ok(Some(snapshot))
    }

    /// The tracker being driven
    pub fn tracker(&self) -> &GazeTracker {
        &self.tracker
    }

    /// Mutable access for calibration and zoom control between frames
    pub fn tracker_mut(&mut self) -> &mut GazeTracker {
        &mut self.tracker
    }
}
