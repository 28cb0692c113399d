//! Gaze feature extraction from facial landmarks.
//!
//! All measurements are normalized by eye-corner distances rather than
//! eyelid or forehead-chin baselines, which stay stable when the jaw hangs
//! open or the eyelids droop.

use crate::constants::{DEFAULT_OPEN_EAR, EPSILON, IMAGE_LEFT_EYE, IMAGE_RIGHT_EYE, NEUTRAL_IRIS_X};
use crate::landmarks::{EyeLandmarks, FaceLandmarks};
use serde::{Deserialize, Serialize};

/// Per-frame gaze and head features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeFeatures {
    /// Horizontal iris position within the eye (0.5 = centered)
    pub rx: f64,
    /// Vertical iris offset from the corner line, in eye widths
    pub ry: f64,
    /// Horizontal head rotation proxy
    pub hx: f64,
    /// Vertical head rotation proxy
    pub hy: f64,
    /// Raw nose tip x
    pub nx: f64,
    /// Raw nose tip y
    pub ny: f64,
    /// Eyelid aperture, in eye widths
    pub ey: f64,
}

impl Default for GazeFeatures {
    fn default() -> Self {
        Self {
            rx: NEUTRAL_IRIS_X,
            ry: 0.0,
            hx: 0.0,
            hy: 0.0,
            nx: 0.5,
            ny: 0.5,
            ey: 0.0,
        }
    }
}

impl GazeFeatures {
    /// Features in declaration order
    pub fn to_array(&self) -> [f64; 7] {
        [self.rx, self.ry, self.hx, self.hy, self.nx, self.ny, self.ey]
    }

    /// Build from an array in declaration order
    pub fn from_array(values: [f64; 7]) -> Self {
        Self {
            rx: values[0],
            ry: values[1],
            hx: values[2],
            hy: values[3],
            nx: values[4],
            ny: values[5],
            ey: values[6],
        }
    }

    /// Component-wise mean, `None` for an empty batch
    pub fn mean(batch: &[Self]) -> Option<Self> {
        if batch.is_empty() {
            return None;
        }
        let mut sums = [0.0; 7];
        for features in batch {
            for (sum, value) in sums.iter_mut().zip(features.to_array()) {
                *sum += value;
            }
        }
        let n = batch.len() as f64;
        Some(Self::from_array(sums.map(|s| s / n)))
    }
}

/// Extract gaze features from one face.
///
/// Pure function: identical landmarks always give identical features.
pub fn extract_features(face: &FaceLandmarks) -> GazeFeatures {
    let left = face.eye(&IMAGE_LEFT_EYE);
    let right = face.eye(&IMAGE_RIGHT_EYE);

    let (left_rx, left_ry) = iris_position(&left);
    let (right_rx, right_ry) = iris_position(&right);

    let nose = face.nose_tip();
    let inner_mid = left.inner.midpoint(&right.inner);
    let inner_dist = left.inner.distance(&right.inner);
    let (hx, hy) = if inner_dist > EPSILON {
        ((nose.x - inner_mid.x) / inner_dist, (nose.y - inner_mid.y) / inner_dist)
    } else {
        (0.0, 0.0)
    };

    GazeFeatures {
        rx: (left_rx + right_rx) / 2.0,
        ry: (left_ry + right_ry) / 2.0,
        hx,
        hy,
        nx: nose.x,
        ny: nose.y,
        ey: (eyelid_aperture(&left) + eyelid_aperture(&right)) / 2.0,
    }
}

/// Iris position relative to the eye corners.
///
/// Horizontal offset is taken from the image-left corner of each eye so both
/// eyes move the same way; vertical offset is from the corner midpoint.
fn iris_position(eye: &EyeLandmarks) -> (f64, f64) {
    let width = eye.width();
    if width <= EPSILON {
        return (NEUTRAL_IRIS_X, 0.0);
    }
    let iris = eye.iris_centroid();
    let corner_mid = eye.inner.midpoint(&eye.outer);
    (
        (iris.x - eye.leftmost_corner().x) / width,
        (iris.y - corner_mid.y) / width,
    )
}

fn eyelid_aperture(eye: &EyeLandmarks) -> f64 {
    let width = eye.width();
    if width <= EPSILON {
        return 0.0;
    }
    (eye.bottom.y - eye.top.y) / width
}

/// Eye aspect ratio averaged over both eyes.
///
/// Low values indicate closed eyes.
pub fn eye_aspect_ratio(face: &FaceLandmarks) -> f64 {
    let left = single_eye_aspect_ratio(&face.eye(&IMAGE_LEFT_EYE));
    let right = single_eye_aspect_ratio(&face.eye(&IMAGE_RIGHT_EYE));
    (left + right) / 2.0
}

fn single_eye_aspect_ratio(eye: &EyeLandmarks) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = eye.contour;
    let horizontal = p1.distance(&p4);
    if horizontal <= EPSILON {
        return DEFAULT_OPEN_EAR;
    }
    (p2.distance(&p6) + p3.distance(&p5)) / (2.0 * horizontal)
}
