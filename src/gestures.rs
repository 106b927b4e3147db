//! Hand gesture classification: zoom, scroll and volume gestures plus the
//! dial keyboard.
//!
//! With the keyboard disabled, the primary hand (right, else left) drives
//! the gesture family. With it enabled, the right hand's tilt selects a
//! character on the dial and left-hand pinches type it.

use crate::{
    config::{GestureConfig, KeyboardConfig},
    debounce::{ActionFamily, Debouncer},
    filters::ExponentialSmoother,
    input::{dispatch, Action, InputInjector},
    landmarks::{Landmark, LandmarkSet},
    utils::safe_cast::{f64_to_i32_clamp, usize_to_i32},
};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

const DIAL_MIN_ANGLE: f64 = -90.0;
const DIAL_MAX_ANGLE: f64 = 0.0;

/// Hand landmarks used by the classifier
#[derive(Debug, Clone, Copy)]
struct Hand {
    wrist: Landmark,
    thumb: Landmark,
    index: Landmark,
    knuckle: Landmark,
    middle: Landmark,
    ring: Landmark,
    little: Landmark,
}

impl Hand {
    fn from_landmarks(landmarks: &LandmarkSet) -> Option<Self> {
        use crate::constants::hand;

        let [wrist, thumb, index, knuckle, middle, ring, little] = landmarks.select([
            hand::WRIST,
            hand::THUMB_TIP,
            hand::INDEX_TIP,
            hand::MIDDLE_KNUCKLE,
            hand::MIDDLE_TIP,
            hand::RING_TIP,
            hand::LITTLE_TIP,
        ])?;

        Some(Self {
            wrist,
            thumb,
            index,
            knuckle,
            middle,
            ring,
            little,
        })
    }

    fn is_fist(&self, threshold: f64) -> bool {
        [self.index, self.middle, self.ring, self.little]
            .iter()
            .all(|tip| tip.distance_2d(&self.wrist) < threshold)
    }

    /// Wrist to middle knuckle tilt, 0 upright, -90 lying flat
    fn dial_angle(&self) -> f64 {
        let angle = (self.wrist.y - self.knuckle.y)
            .atan2(self.wrist.x - self.knuckle.x)
            .to_degrees()
            - 90.0;
        angle.clamp(DIAL_MIN_ANGLE, DIAL_MAX_ANGLE)
    }
}

/// Whether every fingertip of `landmarks` is within `threshold` of the wrist
#[must_use]
pub fn is_fist(landmarks: &LandmarkSet, threshold: f64) -> bool {
    Hand::from_landmarks(landmarks).is_some_and(|hand| hand.is_fist(threshold))
}

/// Index into a character set of `len` entries for a smoothed dial angle
#[must_use]
pub fn dial_index(angle: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = usize_to_i32(len - 1).unwrap_or(i32::MAX);
    let index = f64_to_i32_clamp(angle.abs() / DIAL_MIN_ANGLE.abs() * f64::from(last), 0, last);
    usize::try_from(index).unwrap_or(0)
}

/// Turns hand landmarks into debounced actions
pub struct GestureClassifier {
    gestures: GestureConfig,
    pinch_distance: f64,
    fist_distance: f64,
    letters: Vec<char>,
    symbols: Vec<char>,
    debouncer: Debouncer,
    dial: ExponentialSmoother,
    keyboard_enabled: bool,
    selected: Option<char>,
    injector: Arc<dyn InputInjector>,
}

impl GestureClassifier {
    #[must_use]
    pub fn new(gestures: &GestureConfig, keyboard: &KeyboardConfig, injector: Arc<dyn InputInjector>) -> Self {
        Self {
            gestures: gestures.clone(),
            pinch_distance: keyboard.pinch_distance,
            fist_distance: keyboard.fist_distance,
            letters: keyboard.letters.chars().collect(),
            symbols: keyboard.symbols.chars().collect(),
            debouncer: Debouncer::new(gestures.cooldown()),
            dial: ExponentialSmoother::new(keyboard.dial_smoothing, 0.0),
            keyboard_enabled: keyboard.enabled,
            selected: None,
            injector,
        }
    }

    pub fn process(&mut self, right: Option<&LandmarkSet>, left: Option<&LandmarkSet>) -> Vec<Action> {
        self.process_at(right, left, Instant::now())
    }

    /// Classify one frame's hands observed at `now` and perform the resulting actions
    pub fn process_at(&mut self, right: Option<&LandmarkSet>, left: Option<&LandmarkSet>, now: Instant) -> Vec<Action> {
        let right = right.and_then(Hand::from_landmarks);
        let left = left.and_then(Hand::from_landmarks);

        let actions = if self.keyboard_enabled {
            if let Some(hand) = right {
                self.update_dial(&hand);
            }
            left.and_then(|hand| self.keystroke(&hand, now)).into_iter().collect()
        } else if self.gestures.enabled {
            right.or(left).map(|hand| self.gesture_family(&hand, now)).unwrap_or_default()
        } else {
            Vec::new()
        };

        for action in &actions {
            info!("Gesture: {action}");
            dispatch(self.injector.as_ref(), action);
        }
        actions
    }

    fn gesture_family(&mut self, hand: &Hand, now: Instant) -> Vec<Action> {
        let mut actions = Vec::new();

        let pinch = hand.thumb.distance_2d(&hand.index);
        let zoom = if pinch < self.gestures.zoom_in_distance {
            Some(Action::ZoomIn)
        } else if pinch > self.gestures.zoom_out_distance {
            Some(Action::ZoomOut)
        } else {
            None
        };

        let amount = self.gestures.scroll_amount;
        let scroll = if hand.index.y < hand.middle.y {
            Some(Action::Scroll(amount))
        } else if hand.index.y > hand.middle.y {
            Some(Action::Scroll(-amount))
        } else {
            None
        };

        let volume = if hand.thumb.y < hand.index.y {
            Some(Action::VolumeUp)
        } else if hand.thumb.y > hand.index.y {
            Some(Action::VolumeDown)
        } else {
            None
        };

        for (family, candidate) in [
            (ActionFamily::Zoom, zoom),
            (ActionFamily::Scroll, scroll),
            (ActionFamily::Volume, volume),
        ] {
            if let Some(action) = candidate {
                if self.debouncer.try_fire(family, now) {
                    actions.push(action);
                }
            }
        }
        actions
    }

    fn update_dial(&mut self, hand: &Hand) {
        let angle = self.dial.apply(hand.dial_angle());
        let set = if hand.is_fist(self.fist_distance) {
            &self.symbols
        } else {
            &self.letters
        };

        let selected = set.get(dial_index(angle, set.len())).copied();
        if selected != self.selected {
            debug!("Dial angle {angle:.1}, selected {selected:?}");
        }
        self.selected = selected;
    }

    fn keystroke(&mut self, hand: &Hand, now: Instant) -> Option<Action> {
        if !self.debouncer.is_ready(ActionFamily::Keystroke, now) {
            return None;
        }

        let pinched = |tip: &Landmark| hand.thumb.distance_2d(tip) < self.pinch_distance;
        let action = if pinched(&hand.index) {
            Action::TypeChar(self.selected?)
        } else if pinched(&hand.middle) {
            Action::Space
        } else if pinched(&hand.little) {
            Action::Backspace
        } else {
            return None;
        };

        self.debouncer.try_fire(ActionFamily::Keystroke, now);
        Some(action)
    }

    /// Switch the dial keyboard on or off, returning the new setting
    pub fn toggle_keyboard(&mut self) -> bool {
        self.keyboard_enabled = !self.keyboard_enabled;
        info!("Keyboard {}", if self.keyboard_enabled { "enabled" } else { "disabled" });
        self.keyboard_enabled
    }

    #[must_use]
    pub const fn is_keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    /// Character currently under the dial, once a right hand has been seen
    #[must_use]
    pub const fn selected_char(&self) -> Option<char> {
        self.selected
    }

    /// Smoothed dial angle in degrees
    #[must_use]
    pub const fn dial_angle(&self) -> f64 {
        self.dial.value()
    }
}
