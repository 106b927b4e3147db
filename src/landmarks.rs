//! Landmark sets produced by the external face/hand detector.
//!
//! Points are normalized: `x` and `y` are fractions of the frame width and
//! height, `z` is a relative depth on the same scale as `x`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A single normalized landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance to another landmark in normalized units
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Convert to pixel space; depth is scaled by the frame width
    #[must_use]
    pub fn to_pixel(&self, frame_width: f64, frame_height: f64) -> Vector3<f64> {
        Vector3::new(self.x * frame_width, self.y * frame_height, self.z * frame_width)
    }
}

/// Ordered landmarks for one detected face or hand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, or `None` if the detector did not produce it
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Fetch several landmarks at once; `None` if any index is missing
    #[must_use]
    pub fn select<const N: usize>(&self, indices: [usize; N]) -> Option<[Landmark; N]> {
        let mut out = [Landmark::default(); N];
        for (slot, index) in out.iter_mut().zip(indices) {
            *slot = *self.get(index)?;
        }
        Some(out)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Replace a single landmark, growing the set with zeroed points if needed
    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if index >= self.points.len() {
            self.points.resize(index + 1, Landmark::default());
        }
        self.points[index] = landmark;
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}
