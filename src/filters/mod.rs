//! Smoothing for noisy landmark-derived signals.
//!
//! Head orientation is damped with a bounded window of recent forward
//! vectors; the keyboard dial angle is damped with an exponential smoother.

/// Bounded FIFO of forward vectors with a normalized mean
pub mod window;

/// Exponential smoothing of a scalar signal
pub mod exponential;

pub use exponential::ExponentialSmoother;
pub use window::SmoothingWindow;

use serde::{Deserialize, Serialize};

/// How recorded forward vectors influence the mapped cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Vectors are recorded but the raw angles are mapped unchanged
    #[default]
    Off,
    /// Angles are recomputed from the mean of the window before mapping
    Window,
}

impl SmoothingMode {
    /// Parse a smoothing mode from its config/CLI name
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names
    pub fn from_name(name: &str) -> crate::Result<Self> {
        match name.to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "window" | "moving_average" => Ok(Self::Window),
            _ => Err(crate::Error::InvalidInput(format!("Unknown smoothing mode: {name}"))),
        }
    }
}
