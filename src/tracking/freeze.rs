//! Freeze/recovery gate deciding when gaze predictions may update.

use log::debug;

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Predictions update every frame
    Active,
    /// Eyes closed; the last point is held
    Frozen,
    /// Eyes reopened; still holding for `remaining` more frames
    Recovering {
        /// Frames left before predictions resume
        remaining: u32,
    },
}

/// What the tracker should do with this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Run the predictor
    Predict,
    /// Reset smoothing, then run the predictor
    Resume,
    /// Keep the last reported point
    Hold,
}

/// Hysteresis between eye closure and gaze updates
pub struct FreezeGate {
    ear_threshold: f64,
    recovery_frames: u32,
    state: GateState,
}

impl FreezeGate {
    /// Create a gate freezing below `ear_threshold` and recovering over `recovery_frames`
    pub fn new(ear_threshold: f64, recovery_frames: u32) -> Self {
        Self {
            ear_threshold,
            recovery_frames,
            state: GateState::Active,
        }
    }

    /// Feed one frame's EAR
    pub fn update(&mut self, ear: f64) -> GateDecision {
        let closed = ear < self.ear_threshold;
        let (next, decision) = match (self.state, closed) {
            (GateState::Active, false) => (GateState::Active, GateDecision::Predict),
            (_, true) => (GateState::Frozen, GateDecision::Hold),
            (GateState::Frozen, false) => self.begin_recovery(),
            (GateState::Recovering { remaining }, false) => {
                if remaining <= 1 {
                    (GateState::Active, GateDecision::Resume)
                } else {
                    (
                        GateState::Recovering { remaining: remaining - 1 },
                        GateDecision::Hold,
                    )
                }
            }
        };

        if next != self.state {
            debug!("Freeze gate {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        decision
    }

    fn begin_recovery(&self) -> (GateState, GateDecision) {
        if self.recovery_frames == 0 {
            (GateState::Active, GateDecision::Resume)
        } else {
            (
                GateState::Recovering {
                    remaining: self.recovery_frames,
                },
                GateDecision::Hold,
            )
        }
    }

    /// Current state
    pub fn state(&self) -> GateState {
        self.state
    }

    /// True while predictions are held
    pub fn is_frozen(&self) -> bool {
        !matches!(self.state, GateState::Active)
    }

    /// Return to the active state
    pub fn reset(&mut self) {
        self.state = GateState::Active;
    }
}
