//! Calibration and mapping of head angles to screen coordinates.
//!
//! Calibrated angles are wrapped into `[0, 360)`, snapped to neutral inside
//! the dead zones and mapped linearly so that `180 ± sensitivity` spans the
//! whole screen. The result is clamped to the screen minus a margin and
//! published to the [`SharedCursor`] read by the actuation thread.

use crate::{
    actuator::{CursorTarget, SharedCursor},
    config::CursorConfig,
    constants::{FULL_TURN, NEUTRAL_ANGLE},
    filters::{SmoothingMode, SmoothingWindow},
    orientation::angles_from_forward,
    utils::safe_cast::{f64_to_i32_clamp, u32_to_i32},
};
use log::debug;
use nalgebra::Vector3;

/// Offsets added to raw angles so the calibrated pose reads as neutral
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationOffset {
    pub yaw_offset: f64,
    pub pitch_offset: f64,
}

/// Maps head orientation to a cursor target
#[derive(Debug)]
pub struct CursorMapper {
    config: CursorConfig,
    window: SmoothingWindow,
    offset: CalibrationOffset,
    screen_width: u32,
    screen_height: u32,
    cursor: SharedCursor,
}

impl CursorMapper {
    /// Create a mapper for a screen of the given size, publishing to `cursor`
    ///
    /// The target starts at the screen center.
    #[must_use]
    pub fn new(config: &CursorConfig, screen_width: u32, screen_height: u32, cursor: SharedCursor) -> Self {
        let center = CursorTarget::new(dimension(screen_width / 2), dimension(screen_height / 2));
        cursor.store(center);

        Self {
            config: config.clone(),
            window: SmoothingWindow::new(config.smoothing_window),
            offset: CalibrationOffset::default(),
            screen_width,
            screen_height,
            cursor,
        }
    }

    /// Feed one orientation sample
    ///
    /// Does nothing while mapping is disabled. Returns the new target, or
    /// `None` when nothing was published.
    pub fn update(&mut self, pitch: f64, yaw: f64, forward: &Vector3<f64>) -> Option<CursorTarget> {
        if !self.is_enabled() {
            return None;
        }

        self.window.push(*forward);

        let (pitch, yaw) = match self.config.smoothing {
            SmoothingMode::Off => (pitch, yaw),
            SmoothingMode::Window => self
                .window
                .mean_direction()
                .map_or((pitch, yaw), |mean| angles_from_forward(&mean)),
        };

        if !pitch.is_finite() || !yaw.is_finite() {
            debug!("Skipping non-finite angles: pitch={pitch} yaw={yaw}");
            return None;
        }

        let target = self.map(pitch, yaw);
        debug!("Cursor target: ({}, {})", target.x, target.y);
        self.cursor.store(target);
        Some(target)
    }

    /// Map raw angles to a screen position using the current calibration
    #[must_use]
    pub fn map(&self, pitch: f64, yaw: f64) -> CursorTarget {
        let yaw = snap_to_neutral((yaw + self.offset.yaw_offset).rem_euclid(FULL_TURN), self.config.yaw_dead_zone);
        let pitch = snap_to_neutral(
            (pitch + self.offset.pitch_offset).rem_euclid(FULL_TURN),
            self.config.pitch_dead_zone,
        );

        let sx = self.config.sensitivity_x;
        let sy = self.config.sensitivity_y;
        let width = f64::from(self.screen_width);
        let height = f64::from(self.screen_height);

        let x = ((yaw - (NEUTRAL_ANGLE - sx)) / (2.0 * sx)) * width;
        let y = ((NEUTRAL_ANGLE + sy - pitch) / (2.0 * sy)) * height;

        let margin = self.config.screen_margin;
        CursorTarget::new(
            f64_to_i32_clamp(x, margin, dimension(self.screen_width) - margin),
            f64_to_i32_clamp(y, margin, dimension(self.screen_height) - margin),
        )
    }

    /// Make the given raw angles the new neutral pose
    pub fn calibrate(&mut self, yaw: f64, pitch: f64) {
        self.offset = CalibrationOffset {
            yaw_offset: NEUTRAL_ANGLE - yaw,
            pitch_offset: NEUTRAL_ANGLE - pitch,
        };
        debug!(
            "Calibrated: yaw_offset={:.2} pitch_offset={:.2}",
            self.offset.yaw_offset, self.offset.pitch_offset
        );
    }

    #[must_use]
    pub const fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    /// Last published target
    #[must_use]
    pub fn target_position(&self) -> CursorTarget {
        self.cursor.load()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.cursor.set_enabled(enabled);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.cursor.is_enabled()
    }

    #[must_use]
    pub const fn window(&self) -> &SmoothingWindow {
        &self.window
    }
}

fn snap_to_neutral(angle: f64, dead_zone: f64) -> f64 {
    if (angle - NEUTRAL_ANGLE).abs() < dead_zone {
        NEUTRAL_ANGLE
    } else {
        angle
    }
}

fn dimension(pixels: u32) -> i32 {
    u32_to_i32(pixels).unwrap_or(i32::MAX)
}
