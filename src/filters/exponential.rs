use super::SmoothingFilter;

/// Exponential moving average, seeded by the first input
pub struct ExponentialFilter {
    alpha: f64,
    last: Option<(f64, f64)>,
}

impl ExponentialFilter {
    /// Create a filter weighting the newest value by `alpha`
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is outside `(0, 1]`
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }
}

impl SmoothingFilter for ExponentialFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        let filtered = match self.last {
            Some((lx, ly)) => (
                self.alpha * x + (1.0 - self.alpha) * lx,
                self.alpha * y + (1.0 - self.alpha) * ly,
            ),
            None => (x, y),
        };
        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_filter() {
        let mut filter = ExponentialFilter::new(0.5);

        // First value seeds the average
        assert_eq!(filter.apply(100.0, 200.0), (100.0, 200.0));

        // 0.5 * 200 + 0.5 * 100
        assert_eq!(filter.apply(200.0, 300.0), (150.0, 250.0));
    }

    #[test]
    fn test_reset_reseeds() {
        let mut filter = ExponentialFilter::new(0.1);
        filter.apply(0.0, 0.0);
        filter.reset();
        assert_eq!(filter.apply(500.0, 400.0), (500.0, 400.0));
    }

    #[test]
    #[should_panic(expected = "Alpha must be in (0, 1]")]
    fn test_zero_alpha_panics() {
        let _ = ExponentialFilter::new(0.0);
    }
}
