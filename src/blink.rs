//! Long-blink click detection from the eye aspect ratio (EAR).

use crate::{
    config::BlinkConfig,
    constants::{face, EPSILON},
    input::{dispatch, Action, InputInjector},
    landmarks::LandmarkSet,
};
use log::{debug, info};
use nalgebra::Vector3;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Eye height over eye width for the left eye, in pixel space
///
/// Returns `None` when an eye landmark is missing or the eye corners coincide.
#[must_use]
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> Option<f64> {
    let (w, h) = (f64::from(frame_width), f64::from(frame_height));
    let [p1, p2, p3, p4, p5, p6] = landmarks.select(face::LEFT_EYE)?.map(|lm| lm.to_pixel(w, h));

    let horizontal = planar_distance(&p1, &p4);
    if horizontal < EPSILON {
        return None;
    }

    Some((planar_distance(&p2, &p6) + planar_distance(&p3, &p5)) / (2.0 * horizontal))
}

fn planar_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Emits one click per eye closure lasting at least the configured duration
pub struct BlinkClassifier {
    closed_threshold: f64,
    duration: Duration,
    closed_since: Option<Instant>,
    consumed: bool,
    injector: Arc<dyn InputInjector>,
}

impl BlinkClassifier {
    #[must_use]
    pub fn new(config: &BlinkConfig, injector: Arc<dyn InputInjector>) -> Self {
        Self {
            closed_threshold: config.closed_threshold,
            duration: config.duration(),
            closed_since: None,
            consumed: false,
            injector,
        }
    }

    pub fn process(&mut self, landmarks: &LandmarkSet, frame_width: u32, frame_height: u32) -> Option<Action> {
        self.process_at(landmarks, frame_width, frame_height, Instant::now())
    }

    /// Feed one face landmark set observed at `now`
    ///
    /// Returns the click when one was emitted. An undetermined EAR leaves
    /// the closure state untouched.
    pub fn process_at(
        &mut self,
        landmarks: &LandmarkSet,
        frame_width: u32,
        frame_height: u32,
        now: Instant,
    ) -> Option<Action> {
        let ear = eye_aspect_ratio(landmarks, frame_width, frame_height)?;

        if ear >= self.closed_threshold {
            self.closed_since = None;
            self.consumed = false;
            return None;
        }

        let since = *self.closed_since.get_or_insert(now);
        let closed_for = now.saturating_duration_since(since);
        debug!("Eye closed for {:.2}s (EAR {ear:.3})", closed_for.as_secs_f64());

        if self.consumed || closed_for < self.duration {
            return None;
        }

        self.consumed = true;
        info!("Long blink detected, clicking");
        let action = Action::Click;
        dispatch(self.injector.as_ref(), &action);
        Some(action)
    }

    /// Whether an eye closure is currently being timed
    #[must_use]
    pub const fn is_eye_closed(&self) -> bool {
        self.closed_since.is_some()
    }

    pub fn reset(&mut self) {
        self.closed_since = None;
        self.consumed = false;
    }
}
