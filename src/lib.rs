//! Touchless device control from face and hand landmarks.
//!
//! This library turns landmark sets produced by an external face/hand
//! detector into pointer and keyboard input:
//! - Head orientation (pitch/yaw) estimated from five face mesh anchors
//! - A state machine (OFF, ON, FROZEN, PAUSED) driven by face presence and operator commands
//! - Calibrated, dead-zoned mapping of head angles to screen coordinates
//! - A background actuation thread moving the pointer at a fixed rate
//! - Long-blink clicks, pinch/scroll/volume gestures and a dial keyboard
//!
//! The pipeline for each frame:
//! 1. Update the state machine with face presence
//! 2. Estimate head orientation and, while ON, publish a new cursor target
//! 3. Run the blink and gesture classifiers, injecting their actions
//! 4. Apply operator commands (toggle, calibrate, freeze, ...)
//!
//! # Examples
//!
//! ## Estimating head orientation
//!
//! ```no_run
//! use touchless_control::{landmarks::LandmarkSet, orientation::OrientationEstimator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let face: LandmarkSet = serde_yaml::from_str(&std::fs::read_to_string("face.yaml")?)?;
//! if let Some(orientation) = OrientationEstimator::new().estimate(&face, 640, 480) {
//!     println!("Pitch: {:.2}°, Yaw: {:.2}°", orientation.pitch, orientation.yaw);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Replaying recorded frames
//!
//! ```no_run
//! use std::sync::Arc;
//! use touchless_control::{
//!     app::ControlApp, config::Config, input::RecordingInjector, source::ReplaySource,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let injector = Arc::new(RecordingInjector::new(1920, 1080));
//! let mut app = ControlApp::new(&Config::default(), injector.clone())?;
//! let mut source = ReplaySource::from_path("frames.yaml")?;
//!
//! let summary = app.run(&mut source)?;
//! app.shutdown()?;
//! println!("{} frames, {} actions", summary.frames, summary.actions);
//! # Ok(())
//! # }
//! ```

/// Cursor target sharing and the background actuation thread
pub mod actuator;

/// Main application module
pub mod app;

/// Long-blink click detection
pub mod blink;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Head angle to screen coordinate mapping with calibration
pub mod cursor_mapping;

/// Per-family cooldowns for one-shot actions
pub mod debounce;

/// Error types and result handling
pub mod error;

/// Smoothing filters for orientation and dial angles
pub mod filters;

/// Hand gesture and dial keyboard classification
pub mod gestures;

/// Pointer and keyboard input injection backends
pub mod input;

/// Normalized face and hand landmarks
pub mod landmarks;

/// Head orientation estimation from face landmarks
pub mod orientation;

/// Landmark frame sources
pub mod source;

/// Control state machine
pub mod state_machine;

/// Safe casts and frame-rate measurement
pub mod utils;

pub use error::{Error, Result};
