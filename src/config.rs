//! Configuration management for the touchless control application

use crate::{
    constants::{
        DEFAULT_ACTUATOR_HZ, DEFAULT_SCREEN_MARGIN, DEFAULT_SCROLL_AMOUNT, DEFAULT_SMOOTHING_WINDOW, DIAL_LETTERS,
        DIAL_SYMBOLS,
    },
    filters::SmoothingMode,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// State machine configuration
    pub state: StateConfig,

    /// Angle to screen mapping configuration
    pub cursor: CursorConfig,

    /// Actuation loop configuration
    pub actuator: ActuatorConfig,

    /// Blink click configuration
    pub blink: BlinkConfig,

    /// Hand gesture configuration
    pub gestures: GestureConfig,

    /// On-screen dial keyboard configuration
    pub keyboard: KeyboardConfig,
}

/// State machine timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Seconds without a face before the system pauses
    pub pause_timeout: f64,
}

/// Angle to screen mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Degrees of yaw either side of neutral spanning half the screen width
    pub sensitivity_x: f64,

    /// Degrees of pitch either side of neutral spanning half the screen height
    pub sensitivity_y: f64,

    /// Yaw band around neutral that snaps to the center, in degrees
    pub yaw_dead_zone: f64,

    /// Pitch band around neutral that snaps to the center, in degrees
    pub pitch_dead_zone: f64,

    /// Pixels kept free along every screen edge
    pub screen_margin: i32,

    /// Whether recorded forward vectors smooth the mapped angles
    pub smoothing: SmoothingMode,

    /// Number of forward vectors kept for smoothing
    pub smoothing_window: usize,
}

/// Actuation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Cursor update rate in Hz
    pub rate_hz: f64,

    /// Seconds to wait for the loop to stop on shutdown
    pub shutdown_timeout: f64,
}

/// Long-blink click
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Enable blink clicks
    pub enabled: bool,

    /// Eye aspect ratio below which the eye counts as closed
    pub closed_threshold: f64,

    /// Seconds the eye must stay closed to click
    pub duration: f64,
}

/// Pinch, scroll and volume gestures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Enable hand gestures
    pub enabled: bool,

    /// Seconds between two actions of the same family
    pub cooldown: f64,

    /// Thumb-index distance below which zoom in fires
    pub zoom_in_distance: f64,

    /// Thumb-index distance above which zoom out fires
    pub zoom_out_distance: f64,

    /// Wheel steps per scroll gesture
    pub scroll_amount: i32,
}

/// Dial keyboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Start with the dial keyboard enabled
    pub enabled: bool,

    /// Weight of a new dial angle in the exponential smoothing
    pub dial_smoothing: f64,

    /// Thumb to fingertip distance counting as a pinch
    pub pinch_distance: f64,

    /// Fingertip to wrist distance under which all fingers count as curled
    pub fist_distance: f64,

    /// Characters on the dial for an open hand
    pub letters: String,

    /// Characters on the dial for a fist
    pub symbols: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self { pause_timeout: 0.5 }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            sensitivity_x: 20.0,
            sensitivity_y: 10.0,
            yaw_dead_zone: 2.0,
            pitch_dead_zone: 3.0,
            screen_margin: DEFAULT_SCREEN_MARGIN,
            smoothing: SmoothingMode::Off,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_ACTUATOR_HZ,
            shutdown_timeout: 1.0,
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            closed_threshold: 0.20,
            duration: 1.0,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown: 0.4,
            zoom_in_distance: 0.03,
            zoom_out_distance: 0.08,
            scroll_amount: DEFAULT_SCROLL_AMOUNT,
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dial_smoothing: 0.2,
            pinch_distance: 0.06,
            fist_distance: 0.18,
            letters: DIAL_LETTERS.to_string(),
            symbols: DIAL_SYMBOLS.to_string(),
        }
    }
}

/// Seconds as a `Duration`, zero for negative or NaN values and saturating
/// at `Duration::MAX`. Validated configs never hit either bound.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(if value > 0.0 { Duration::MAX } else { Duration::ZERO })
}

impl StateConfig {
    #[must_use]
    pub fn pause_timeout(&self) -> Duration {
        seconds(self.pause_timeout)
    }
}

impl ActuatorConfig {
    /// Time between two cursor updates
    #[must_use]
    pub fn interval(&self) -> Duration {
        seconds(self.rate_hz.recip())
    }

    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        seconds(self.shutdown_timeout)
    }
}

impl BlinkConfig {
    #[must_use]
    pub fn duration(&self) -> Duration {
        seconds(self.duration)
    }
}

impl GestureConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown)
    }
}

fn check(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::ConfigError(message.to_string()))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Non-negative and representable as a `Duration`
fn is_duration(value: f64) -> bool {
    is_non_negative(value) && Duration::try_from_secs_f64(value).is_ok()
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        check(is_duration(self.state.pause_timeout), "Pause timeout must be a non-negative number of seconds")?;

        // Mapping
        check(is_positive(self.cursor.sensitivity_x), "Horizontal sensitivity must be greater than 0")?;
        check(is_positive(self.cursor.sensitivity_y), "Vertical sensitivity must be greater than 0")?;
        check(is_non_negative(self.cursor.yaw_dead_zone), "Yaw dead zone must not be negative")?;
        check(is_non_negative(self.cursor.pitch_dead_zone), "Pitch dead zone must not be negative")?;
        check(self.cursor.screen_margin >= 0, "Screen margin must not be negative")?;
        check(self.cursor.smoothing_window > 0, "Smoothing window size must be greater than 0")?;

        // Actuation
        check(is_positive(self.actuator.rate_hz), "Actuator rate must be greater than 0")?;
        check(is_duration(self.actuator.rate_hz.recip()), "Actuator rate is too low")?;
        check(is_duration(self.actuator.shutdown_timeout), "Shutdown timeout must be a non-negative number of seconds")?;

        // Blink
        check(is_positive(self.blink.closed_threshold), "Eye closed threshold must be greater than 0")?;
        check(is_duration(self.blink.duration), "Blink duration must be a non-negative number of seconds")?;

        // Gestures
        check(is_duration(self.gestures.cooldown), "Gesture cooldown must be a non-negative number of seconds")?;
        check(is_positive(self.gestures.zoom_in_distance), "Zoom in distance must be greater than 0")?;
        check(
            self.gestures.zoom_out_distance.is_finite()
                && self.gestures.zoom_out_distance > self.gestures.zoom_in_distance,
            "Zoom out distance must be greater than zoom in distance",
        )?;

        // Keyboard
        check(
            self.keyboard.dial_smoothing > 0.0 && self.keyboard.dial_smoothing <= 1.0,
            "Dial smoothing must be in (0, 1]",
        )?;
        check(is_positive(self.keyboard.pinch_distance), "Keyboard pinch distance must be greater than 0")?;
        check(is_positive(self.keyboard.fist_distance), "Fist distance must be greater than 0")?;
        check(!self.keyboard.letters.is_empty(), "Dial letters must not be empty")?;
        check(!self.keyboard.symbols.is_empty(), "Dial symbols must not be empty")?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Touchless Control Configuration

# State machine
state:
  pause_timeout: 0.5

# Head orientation to screen mapping
cursor:
  sensitivity_x: 20.0
  sensitivity_y: 10.0
  yaw_dead_zone: 2.0
  pitch_dead_zone: 3.0
  screen_margin: 10
  smoothing: off
  smoothing_window: 8

# Cursor actuation loop
actuator:
  rate_hz: 100.0
  shutdown_timeout: 1.0

# Long blink click
blink:
  enabled: true
  closed_threshold: 0.2
  duration: 1.0

# Hand gestures
gestures:
  enabled: true
  cooldown: 0.4
  zoom_in_distance: 0.03
  zoom_out_distance: 0.08
  scroll_amount: 50

# Dial keyboard
keyboard:
  enabled: false
  dial_smoothing: 0.2
  pinch_distance: 0.06
  fist_distance: 0.18
  letters: " ABCDEFGHIJKLMNOPQRSTUVWXYZ"
  symbols: "1234567890.,!?;:@#&+-/*="
"#;
