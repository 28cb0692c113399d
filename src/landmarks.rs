//! Landmark frame types supplied by the external face landmark detector.
//!
//! Points are normalized camera coordinates in `[0, 1]`. The schema is fixed:
//! the 478-point face mesh with refined iris points, indexed through the
//! constants in [`crate::constants`].

use crate::constants::{EyeIndices, NOSE_TIP, NUM_FACE_LANDMARKS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A normalized 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Centroid of a non-empty set of points, `None` when empty
    pub fn centroid(points: &[Self]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Self::new(sx / n, sy / n))
    }
}

/// Landmarks of a single detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct FaceLandmarks {
    points: Vec<Point2>,
}

impl FaceLandmarks {
    /// Wrap a detector output, checking it matches the schema
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if fewer than [`NUM_FACE_LANDMARKS`] points
    /// are supplied and `Error::DegenerateLandmark` if any coordinate is not finite
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if points.len() < NUM_FACE_LANDMARKS {
            return Err(Error::InvalidInput(format!(
                "Expected {NUM_FACE_LANDMARKS} landmarks, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(Error::DegenerateLandmark(format!("Landmark {i} is not finite")));
        }
        Ok(Self { points })
    }

    /// Point at a schema index
    pub fn point(&self, index: usize) -> Point2 {
        self.points[index]
    }

    /// All points
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Nose tip
    pub fn nose_tip(&self) -> Point2 {
        self.point(NOSE_TIP)
    }

    /// Resolve the landmarks of one eye
    pub fn eye(&self, indices: &EyeIndices) -> EyeLandmarks {
        EyeLandmarks {
            inner: self.point(indices.inner),
            outer: self.point(indices.outer),
            top: self.point(indices.top),
            bottom: self.point(indices.bottom),
            iris: indices.iris.map(|i| self.point(i)),
            contour: indices.contour.map(|i| self.point(i)),
        }
    }

    /// Apply a point mapping to every landmark
    pub fn map_points<F: Fn(Point2) -> Point2>(&self, f: F) -> Self {
        Self {
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

impl TryFrom<Vec<Point2>> for FaceLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Point2>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<FaceLandmarks> for Vec<Point2> {
    fn from(landmarks: FaceLandmarks) -> Self {
        landmarks.points
    }
}

/// Resolved landmarks of one eye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks {
    /// Corner nearest the nose
    pub inner: Point2,
    /// Corner nearest the temple
    pub outer: Point2,
    /// Upper eyelid
    pub top: Point2,
    /// Lower eyelid
    pub bottom: Point2,
    /// Iris cluster
    pub iris: [Point2; 5],
    /// EAR contour p1..p6
    pub contour: [Point2; 6],
}

impl EyeLandmarks {
    /// Distance between the two corners
    pub fn width(&self) -> f64 {
        self.inner.distance(&self.outer)
    }

    /// Corner with the smaller image x coordinate
    pub fn leftmost_corner(&self) -> Point2 {
        if self.inner.x <= self.outer.x {
            self.inner
        } else {
            self.outer
        }
    }

    /// Centroid of the iris cluster
    pub fn iris_centroid(&self) -> Point2 {
        Point2::centroid(&self.iris).unwrap_or_else(|| self.inner.midpoint(&self.outer))
    }
}

/// One frame handed over by the landmark detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Monotonic timestamp in seconds
    pub timestamp: f64,
    /// Detected face, `None` when no face was found
    #[serde(default)]
    pub landmarks: Option<FaceLandmarks>,
}

impl LandmarkFrame {
    /// Frame with a detected face
    pub fn with_face(timestamp: f64, landmarks: FaceLandmarks) -> Self {
        Self {
            timestamp,
            landmarks: Some(landmarks),
        }
    }

    /// Frame where no face was detected
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            landmarks: None,
        }
    }

    /// The detected face
    ///
    /// # Errors
    ///
    /// Returns `Error::InputUnavailable` when no face was detected
    pub fn face(&self) -> Result<&FaceLandmarks> {
        match &self.landmarks {
            Some(face) => Ok(face),
            None => Err(Error::InputUnavailable),
        }
    }
}
