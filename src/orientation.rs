//! Head orientation estimation from face mesh landmarks.
//!
//! Five anchors (both cheeks, top of head, chin, nose tip) are lifted to
//! pixel space and used to build a head frame. The forward axis of that frame
//! is compared against the camera-facing reference `(0, 0, -1)`: yaw on the
//! horizontal (X-Z) plane and pitch on the vertical (Y-Z) plane. Looking
//! straight at the camera gives 180 degrees on both axes.

use crate::{
    constants::{face, EPSILON},
    landmarks::LandmarkSet,
};
use nalgebra::Vector3;

/// Head orientation for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Vertical rotation in degrees, negative when looking up
    pub pitch: f64,
    /// Horizontal rotation in degrees, negative when turned towards -X
    pub yaw: f64,
    /// Unit vector pointing out of the face
    pub forward: Vector3<f64>,
}

/// Stateless head orientation estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationEstimator;

impl OrientationEstimator {
    const ANCHORS: [usize; 5] = [
        face::LEFT_CHEEK,
        face::RIGHT_CHEEK,
        face::TOP_OF_HEAD,
        face::CHIN,
        face::NOSE_TIP,
    ];

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Estimate pitch, yaw and forward vector from a face landmark set
    ///
    /// Returns `None` when an anchor is missing from the set or when the
    /// anchors are coincident so that no head frame can be built.
    #[must_use]
    pub fn estimate(&self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> Option<Orientation> {
        let [left, right, top, bottom, _nose] = landmarks.select(Self::ANCHORS)?;
        let (w, h) = (f64::from(frame_width), f64::from(frame_height));

        let left = left.to_pixel(w, h);
        let right = right.to_pixel(w, h);
        let top = top.to_pixel(w, h);
        let bottom = bottom.to_pixel(w, h);

        let right_axis = (right - left).try_normalize(EPSILON)?;
        let up_axis = (top - bottom).try_normalize(EPSILON)?;
        let forward = -right_axis.cross(&up_axis).try_normalize(EPSILON)?;

        let (pitch, yaw) = angles_from_forward(&forward);
        log::trace!("Orientation: pitch={pitch:.2} yaw={yaw:.2}");

        Some(Orientation { pitch, yaw, forward })
    }
}

/// Reference direction for "looking straight at the camera"
fn reference_forward() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -1.0)
}

/// Compute (pitch, yaw) in degrees from a forward vector
///
/// A projection with zero length is used as-is, which yields 90 degrees.
#[must_use]
pub fn angles_from_forward(forward: &Vector3<f64>) -> (f64, f64) {
    let reference = reference_forward();

    let xz = Vector3::new(forward.x, 0.0, forward.z);
    let mut yaw = angle_between(&reference, &normalize_or_raw(xz));
    if forward.x < 0.0 {
        yaw = -yaw;
    }

    let yz = Vector3::new(0.0, forward.y, forward.z);
    let mut pitch = angle_between(&reference, &normalize_or_raw(yz));
    if forward.y > 0.0 {
        pitch = -pitch;
    }

    (pitch, yaw)
}

fn normalize_or_raw(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm > 0.0 {
        v / norm
    } else {
        v
    }
}

fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}
