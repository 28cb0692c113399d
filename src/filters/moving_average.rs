use super::SmoothingFilter;
use std::collections::VecDeque;

/// Mean of the most recent `window_size` points
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<(f64, f64)>,
}

impl MovingAverageFilter {
    /// Create a new moving average over `window_size` points
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Points currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl SmoothingFilter for MovingAverageFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back((x, y));

        let n = self.buffer.len() as f64;
        let (sx, sy) = self
            .buffer
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &(bx, by)| (sx + bx, sy + by));
        (sx / n, sy / n)
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
