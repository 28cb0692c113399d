use super::SmoothingFilter;

/// Holds its output until the input moves more than `threshold` away from it.
///
/// The first input after creation or reset always passes.
pub struct DeadZoneFilter {
    threshold: f64,
    last: Option<(f64, f64)>,
}

impl DeadZoneFilter {
    /// Create a dead zone of `threshold` units
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is negative or NaN
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        assert!(threshold >= 0.0, "Threshold must be non-negative");
        Self { threshold, last: None }
    }

    /// Last reported point
    pub fn last(&self) -> Option<(f64, f64)> {
        self.last
    }
}

impl SmoothingFilter for DeadZoneFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        match self.last {
            Some((lx, ly)) if (x - lx).hypot(y - ly) <= self.threshold => (lx, ly),
            _ => {
                self.last = Some((x, y));
                (x, y)
            }
        }
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "DeadZoneFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_moves_are_held() {
        let mut filter = DeadZoneFilter::new(10.0);
        assert_eq!(filter.apply(100.0, 100.0), (100.0, 100.0));
        assert_eq!(filter.apply(106.0, 108.0), (100.0, 100.0));
        assert_eq!(filter.apply(103.0, 95.0), (100.0, 100.0));
    }

    #[test]
    fn test_large_move_updates() {
        let mut filter = DeadZoneFilter::new(10.0);
        filter.apply(100.0, 100.0);
        assert_eq!(filter.apply(112.0, 100.0), (112.0, 100.0));
        // Measured from the new reported point
        assert_eq!(filter.apply(104.0, 100.0), (112.0, 100.0));
    }

    #[test]
    fn test_drift_does_not_accumulate() {
        let mut filter = DeadZoneFilter::new(10.0);
        filter.apply(0.0, 0.0);
        for i in 1..=9 {
            assert_eq!(filter.apply(f64::from(i), 0.0), (0.0, 0.0));
        }
        assert_eq!(filter.apply(11.0, 0.0), (11.0, 0.0));
    }

    #[test]
    fn test_reset_passes_next_input() {
        let mut filter = DeadZoneFilter::new(50.0);
        filter.apply(0.0, 0.0);
        filter.reset();
        assert!(filter.last().is_none());
        assert_eq!(filter.apply(1.0, 1.0), (1.0, 1.0));
    }
}
