//! Constants used throughout the library

/// Number of points in the face mesh schema (468 mesh points + 10 refined iris points)
pub const NUM_FACE_LANDMARKS: usize = 478;

/// Nose tip landmark index
pub const NOSE_TIP: usize = 1;

/// Landmark indices describing one eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeIndices {
    /// Corner nearest the nose
    pub inner: usize,
    /// Corner nearest the temple
    pub outer: usize,
    /// Upper eyelid midpoint
    pub top: usize,
    /// Lower eyelid midpoint
    pub bottom: usize,
    /// Iris center followed by four iris boundary points
    pub iris: [usize; 5],
    /// EAR contour p1..p6: outer corner, two upper lid points, inner corner, two lower lid points
    pub contour: [usize; 6],
}

/// Eye appearing on the left of the camera image (the subject's right eye)
pub const IMAGE_LEFT_EYE: EyeIndices = EyeIndices {
    inner: 133,
    outer: 33,
    top: 159,
    bottom: 145,
    iris: [468, 469, 470, 471, 472],
    contour: [33, 160, 158, 133, 153, 144],
};

/// Eye appearing on the right of the camera image (the subject's left eye)
pub const IMAGE_RIGHT_EYE: EyeIndices = EyeIndices {
    inner: 362,
    outer: 263,
    top: 386,
    bottom: 374,
    iris: [473, 474, 475, 476, 477],
    contour: [263, 387, 385, 362, 380, 373],
};

/// Length of the polynomial feature vector, bias included
pub const POLY_FEATURES: usize = 11;

/// Minimum number of samples for a calibration fit (one per free coefficient)
pub const MIN_CALIBRATION_SAMPLES: usize = 10;

/// EAR substituted for an eye whose corners collapse onto each other
pub const DEFAULT_OPEN_EAR: f64 = 0.3;

/// Neutral horizontal iris position
pub const NEUTRAL_IRIS_X: f64 = 0.5;

/// Smallest pivot magnitude treated as non-singular
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Standard deviations below this are treated as a constant column
pub const STD_EPSILON: f64 = 1e-9;

/// Numeric precision epsilon for landmark geometry
pub const EPSILON: f64 = 1e-9;

/// Smoothing factor of the FPS estimate
pub const FPS_SMOOTHING: f64 = 0.1;
