//! Helper functions and utilities for tests

#![allow(dead_code)]

use gaze_tracking::{
    calibration::{CalibrationSample, ScreenPoint},
    config::Config,
    constants::{EyeIndices, IMAGE_LEFT_EYE, IMAGE_RIGHT_EYE, NOSE_TIP, NUM_FACE_LANDMARKS},
    features::GazeFeatures,
    landmarks::{FaceLandmarks, LandmarkFrame, Point2},
};

/// Eye width used by the synthetic face, in normalized image units
pub const EYE_WIDTH: f64 = 0.1;

/// Vertical position of both eye corner lines
pub const EYE_LINE_Y: f64 = 0.4;

/// Builds a synthetic face mesh with controllable iris, eyelids and nose.
///
/// Geometry is chosen so that `extract_features` recovers the inputs:
/// `rx == iris_x`, `ry == iris_y`, `ey == ear`, and `eye_aspect_ratio == ear`.
#[derive(Debug, Clone, Copy)]
pub struct FaceBuilder {
    iris_x: f64,
    iris_y: f64,
    ear: f64,
    nose: (f64, f64),
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self {
            iris_x: 0.5,
            iris_y: 0.0,
            ear: 0.3,
            nose: (0.5, 0.55),
        }
    }
}

impl FaceBuilder {
    /// Iris position as a fraction of eye width, and vertical offset in eye widths
    pub fn iris(mut self, x: f64, y: f64) -> Self {
        self.iris_x = x;
        self.iris_y = y;
        self
    }

    /// Eye aspect ratio of both eyes
    pub fn ear(mut self, ear: f64) -> Self {
        self.ear = ear;
        self
    }

    /// Nose tip position
    pub fn nose(mut self, x: f64, y: f64) -> Self {
        self.nose = (x, y);
        self
    }

    /// Build the landmark set
    pub fn build(&self) -> FaceLandmarks {
        let mut points = vec![Point2::new(0.5, 0.7); NUM_FACE_LANDMARKS];
        self.place_eye(&mut points, &IMAGE_LEFT_EYE, 0.35, true);
        self.place_eye(&mut points, &IMAGE_RIGHT_EYE, 0.55, false);
        points[NOSE_TIP] = Point2::new(self.nose.0, self.nose.1);
        FaceLandmarks::new(points).unwrap()
    }

    /// Frame at `timestamp` containing this face
    pub fn frame(&self, timestamp: f64) -> LandmarkFrame {
        LandmarkFrame::with_face(timestamp, self.build())
    }

    fn place_eye(&self, points: &mut [Point2], eye: &EyeIndices, left_x: f64, outer_on_left: bool) {
        let right_x = left_x + EYE_WIDTH;
        let y = EYE_LINE_Y;
        let h = self.ear * EYE_WIDTH / 2.0;

        let (inner_x, outer_x) = if outer_on_left {
            (right_x, left_x)
        } else {
            (left_x, right_x)
        };
        points[eye.inner] = Point2::new(inner_x, y);
        points[eye.outer] = Point2::new(outer_x, y);
        points[eye.top] = Point2::new(left_x + EYE_WIDTH / 2.0, y - h);
        points[eye.bottom] = Point2::new(left_x + EYE_WIDTH / 2.0, y + h);

        // Contour p1..p6: corner, upper pair, opposite corner, lower pair
        let [p1, p2, p3, p4, p5, p6] = eye.contour;
        let near = points[p1].x;
        let far = points[p4].x;
        let third = |t: f64| near + (far - near) * t;
        points[p2] = Point2::new(third(1.0 / 3.0), y - h);
        points[p3] = Point2::new(third(2.0 / 3.0), y - h);
        points[p5] = Point2::new(third(2.0 / 3.0), y + h);
        points[p6] = Point2::new(third(1.0 / 3.0), y + h);

        let cx = left_x + self.iris_x * EYE_WIDTH;
        let cy = y + self.iris_y * EYE_WIDTH;
        let [c, a, b, d, e] = eye.iris;
        points[c] = Point2::new(cx, cy);
        points[a] = Point2::new(cx + 0.01, cy);
        points[b] = Point2::new(cx, cy - 0.01);
        points[d] = Point2::new(cx - 0.01, cy);
        points[e] = Point2::new(cx, cy + 0.01);
    }
}

/// Features varying only in iris position
pub fn iris_features(rx: f64, ry: f64) -> GazeFeatures {
    GazeFeatures {
        rx,
        ry,
        ..GazeFeatures::default()
    }
}

/// Samples on a `rows x cols` grid where the target is exactly linear in
/// `rx` and `ry`
pub fn linear_samples(rows: usize, cols: usize, width: f64, height: f64) -> Vec<CalibrationSample> {
    let mut samples = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let u = c as f64 / (cols - 1) as f64;
            let v = r as f64 / (rows - 1) as f64;
            samples.push(CalibrationSample {
                features: iris_features(0.35 + 0.3 * u, -0.1 + 0.2 * v),
                target: ScreenPoint::new(0.1 * width + 0.8 * width * u, 0.1 * height + 0.8 * height * v),
            });
        }
    }
    samples
}

/// Default configuration with a near-zero ridge penalty so linear data fits exactly
pub fn exact_fit_config() -> Config {
    let mut config = Config::default();
    config.calibration.ridge_lambda = 1e-6;
    config
}

/// Assert two values are within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
