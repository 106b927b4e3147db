//! Utility helpers: safe numeric casts and frame-rate measurement.

pub mod safe_cast;

use std::time::Instant;

/// Instantaneous frames-per-second counter
#[derive(Debug, Clone)]
pub struct FpsCounter {
    last_tick: Instant,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Instant::now())
    }

    #[must_use]
    pub const fn new_at(now: Instant) -> Self {
        Self { last_tick: now }
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Record a frame at `now` and return the rate implied by the gap since the previous one
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        1.0 / (elapsed + 1e-6)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
