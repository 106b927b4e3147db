/// Exponential smoothing of a scalar signal
///
/// Unlike a pass-through-first filter, the smoother starts from a fixed
/// initial value, so the first samples are pulled towards it.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f64,
    initial: f64,
    value: f64,
}

impl ExponentialSmoother {
    /// Create a smoother with weight `alpha` for new samples, starting at `initial`
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64, initial: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self {
            alpha,
            initial,
            value: initial,
        }
    }

    /// Blend a new sample in and return the smoothed value
    pub fn apply(&mut self, sample: f64) -> f64 {
        self.value = self.alpha.mul_add(sample, (1.0 - self.alpha) * self.value);
        self.value
    }

    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = self.initial;
    }
}
