//! Landmark sources feeding the control pipeline.
//!
//! A detector is outside this crate; frames arrive as landmark sets. The
//! replay source reads them from a multi-document YAML stream, one document
//! per frame:
//!
//! ```yaml
//! timestamp: 0.033
//! width: 640
//! height: 480
//! face: [{x: 0.5, y: 0.5, z: 0.0}, ...]
//! right_hand: [...]
//! commands: [toggle]
//! ---
//! width: 640
//! ...
//! ```

use crate::{landmarks::LandmarkSet, Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Operator command attached to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Switch cursor control on or off
    Toggle,
    /// Use the current head pose as neutral
    Calibrate,
    Freeze,
    Unfreeze,
    /// Switch the dial keyboard on or off
    ToggleKeyboard,
    /// Stop processing frames
    Quit,
}

/// Everything the detector produced for one camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    /// Seconds since the start of the recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub face: Option<LandmarkSet>,
    pub right_hand: Option<LandmarkSet>,
    pub left_hand: Option<LandmarkSet>,
    pub commands: Vec<Command>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            timestamp: None,
            width: 640,
            height: 480,
            face: None,
            right_hand: None,
            left_hand: None,
            commands: Vec::new(),
        }
    }
}

impl Frame {
    #[must_use]
    pub fn has_command(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }

    /// Capture time relative to the start of the recording, if it is a
    /// representable non-negative number of seconds
    #[must_use]
    pub fn offset(&self) -> Option<Duration> {
        self.timestamp.and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}

/// Produces frames until exhausted
pub trait LandmarkSource {
    /// Next frame, or `None` once the source is exhausted
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read or decoded
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Replays recorded frames from YAML
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Frame>,
}

impl ReplaySource {
    /// Parse every document of a multi-document YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if a document is not a valid frame
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut frames = VecDeque::new();
        for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let frame = Frame::deserialize(document)
                .map_err(|e| Error::InvalidInput(format!("Invalid frame #{index}: {e}")))?;
            frames.push_back(frame);
        }
        debug!("Parsed {} replay frames", frames.len());
        Ok(Self { frames })
    }

    /// Load frames from a file, or from stdin when `path` is `-`
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = if path == Path::new("-") {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            content
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| Error::IoError(format!("Failed to read {}: {e}", path.display())))?
        };

        let source = Self::from_yaml(&content)?;
        info!("Loaded {} frames from {}", source.len(), path.display());
        Ok(source)
    }

    #[must_use]
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames: frames.into() }
    }

    /// Frames left to replay
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}
