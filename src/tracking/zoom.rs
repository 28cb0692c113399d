//! Center-crop zoom applied to the frame handed to the landmark detector.
//!
//! Zoom only changes what the detector sees; landmarks found in the crop
//! are mapped back to full-frame coordinates.

use crate::config::ZoomConfig;
use crate::landmarks::{FaceLandmarks, Point2};
use log::debug;

/// Centered crop in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width as a fraction of the frame
    pub width: f64,
    /// Height as a fraction of the frame
    pub height: f64,
}

/// Crop rectangle in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl CropRegion {
    /// The whole frame
    pub const FULL: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Map a point normalized to the crop into full-frame coordinates
    pub fn map_to_frame(&self, p: Point2) -> Point2 {
        Point2::new(self.x + p.x * self.width, self.y + p.y * self.height)
    }

    /// Map every landmark of a face found in the crop
    pub fn map_landmarks(&self, face: &FaceLandmarks) -> FaceLandmarks {
        face.map_points(|p| self.map_to_frame(p))
    }

    /// Crop rectangle for a frame of the given size, at least one pixel in each dimension
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Values clamped to the frame first
    pub fn pixel_rect(&self, frame_width: u32, frame_height: u32) -> PixelRect {
        let to_px = |fraction: f64, extent: u32| -> u32 {
            (fraction * f64::from(extent)).round().clamp(0.0, f64::from(extent)) as u32
        };
        let width = to_px(self.width, frame_width).max(1).min(frame_width.max(1));
        let height = to_px(self.height, frame_height).max(1).min(frame_height.max(1));
        let x = to_px(self.x, frame_width).min(frame_width.saturating_sub(width));
        let y = to_px(self.y, frame_height).min(frame_height.saturating_sub(height));
        PixelRect { x, y, width, height }
    }
}

/// Zoom factor clamped to configured bounds and changed in fixed steps
pub struct Zoom {
    config: ZoomConfig,
    level: f64,
}

impl Zoom {
    /// Create a zoom at the configured initial level
    pub fn new(config: ZoomConfig) -> Self {
        let level = if config.initial.is_finite() {
            config.initial.clamp(config.min, config.max)
        } else {
            config.min
        };
        Self { config, level }
    }

    /// Current zoom factor
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Set the zoom factor, clamped to bounds. A non-finite level leaves the zoom unchanged.
    pub fn set(&mut self, level: f64) -> f64 {
        if !level.is_finite() {
            debug!("Ignoring non-finite zoom level {level}");
            return self.level;
        }
        let clamped = level.clamp(self.config.min, self.config.max);
        if (clamped - self.level).abs() > f64::EPSILON {
            debug!("Zoom {:.2} -> {clamped:.2}", self.level);
        }
        self.level = clamped;
        self.level
    }

    /// Increase by one step
    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.level + self.config.step)
    }

    /// Decrease by one step
    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.level - self.config.step)
    }

    /// Back to the minimum (no crop)
    pub fn reset(&mut self) -> f64 {
        self.set(self.config.min)
    }

    /// Centered crop for the current level
    pub fn crop_region(&self) -> CropRegion {
        let size = 1.0 / self.level;
        let offset = (1.0 - size) / 2.0;
        CropRegion {
            x: offset,
            y: offset,
            width: size,
            height: size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom() -> Zoom {
        Zoom::new(ZoomConfig {
            min: 1.0,
            max: 2.0,
            step: 0.5,
            initial: 1.0,
        })
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut z = zoom();
        assert_eq!(z.zoom_in(), 1.5);
        assert_eq!(z.zoom_in(), 2.0);
        assert_eq!(z.zoom_in(), 2.0);
        assert_eq!(z.zoom_out(), 1.5);
        assert_eq!(z.reset(), 1.0);
        assert_eq!(z.zoom_out(), 1.0);
        assert_eq!(z.set(10.0), 2.0);
    }

    #[test]
    fn test_non_finite_level_keeps_current() {
        let mut z = zoom();
        z.set(1.5);
        assert_eq!(z.set(f64::NAN), 1.5);
        assert_eq!(z.set(f64::INFINITY), 1.5);
        assert_eq!(z.set(f64::NEG_INFINITY), 1.5);
        assert!(z.crop_region().x.is_finite());

        let z = Zoom::new(ZoomConfig {
            min: 1.0,
            max: 2.0,
            step: 0.5,
            initial: f64::NAN,
        });
        assert_eq!(z.level(), 1.0);
    }

    #[test]
    fn test_crop_region_is_centered() {
        let mut z = zoom();
        assert_eq!(z.crop_region(), CropRegion::FULL);
        z.set(2.0);
        let crop = z.crop_region();
        assert_eq!(crop.x, 0.25);
        assert_eq!(crop.width, 0.5);
    }

    #[test]
    fn test_map_to_frame() {
        let crop = CropRegion {
            x: 0.25,
            y: 0.25,
            width: 0.5,
            height: 0.5,
        };
        assert_eq!(crop.map_to_frame(Point2::new(0.5, 0.5)), Point2::new(0.5, 0.5));
        assert_eq!(crop.map_to_frame(Point2::new(0.0, 1.0)), Point2::new(0.25, 0.75));
    }

    #[test]
    fn test_pixel_rect() {
        let crop = CropRegion {
            x: 0.25,
            y: 0.25,
            width: 0.5,
            height: 0.5,
        };
        let rect = crop.pixel_rect(640, 480);
        assert_eq!(
            rect,
            PixelRect {
                x: 160,
                y: 120,
                width: 320,
                height: 240
            }
        );
        assert_eq!(
            CropRegion::FULL.pixel_rect(640, 480),
            PixelRect {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
    }
}
