//! Cooldown gating for one-shot actions.
//!
//! Each action family keeps its own last-fired timestamp so that, for
//! example, a scroll and a volume change can fire in the same frame while two
//! scrolls cannot fire within one cooldown.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Independently gated families of actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionFamily {
    Zoom,
    Scroll,
    Volume,
    Keystroke,
}

/// Per-family cooldown timers
#[derive(Debug, Clone)]
pub struct Debouncer {
    cooldown: Duration,
    last_fired: HashMap<ActionFamily, Instant>,
}

impl Debouncer {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: HashMap::new(),
        }
    }

    /// Whether `family` is out of its cooldown at `now`
    #[must_use]
    pub fn is_ready(&self, family: ActionFamily, now: Instant) -> bool {
        self.last_fired
            .get(&family)
            .map_or(true, |last| now.saturating_duration_since(*last) >= self.cooldown)
    }

    /// Fire `family` if it is ready, recording `now` as its last firing
    pub fn try_fire(&mut self, family: ActionFamily, now: Instant) -> bool {
        if !self.is_ready(family, now) {
            return false;
        }
        self.last_fired.insert(family, now);
        true
    }

    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn reset(&mut self) {
        self.last_fired.clear();
    }
}
