//! Input injection: the seam between classifiers and the operating system.
//!
//! Every call may fail transiently (display hiccup, missing key mapping).
//! Callers on the control path go through [`dispatch`], which logs the
//! failure and carries on.

/// X11 backend (core protocol + XTEST)
pub mod x11;

/// Logging/recording backend for dry runs and tests
pub mod recording;

pub use recording::{InjectedCall, RecordingInjector};
pub use x11::X11Injector;

use crate::Result;
use log::{debug, warn};
use std::fmt;

/// Synthesizes pointer and keyboard input
pub trait InputInjector: Send + Sync {
    /// Move the pointer to absolute screen coordinates
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<()>;

    /// Left click at the current pointer position
    fn click(&self) -> Result<()>;

    /// Press and release a named key (`"space"`, `"volumeup"`, `"a"`, ...)
    fn press_key(&self, name: &str) -> Result<()>;

    /// Scroll by `amount` wheel steps; positive scrolls up
    fn scroll(&self, amount: i32) -> Result<()>;

    /// Type a string character by character
    fn type_text(&self, text: &str) -> Result<()>;

    /// Press keys in order, then release them in reverse order
    fn hotkey(&self, keys: &[&str]) -> Result<()>;

    /// Screen size in pixels
    fn screen_size(&self) -> Result<(u32, u32)>;
}

/// A one-shot action emitted by a classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    ZoomIn,
    ZoomOut,
    /// Wheel steps, positive scrolls up
    Scroll(i32),
    VolumeUp,
    VolumeDown,
    TypeChar(char),
    Space,
    Backspace,
}

impl Action {
    /// Carry out the action through `injector`
    ///
    /// # Errors
    ///
    /// Propagates the injector's error
    pub fn perform(&self, injector: &dyn InputInjector) -> Result<()> {
        match self {
            Self::Click => injector.click(),
            Self::ZoomIn => injector.hotkey(&["ctrl", "+"]),
            Self::ZoomOut => injector.hotkey(&["ctrl", "-"]),
            Self::Scroll(amount) => injector.scroll(*amount),
            Self::VolumeUp => injector.press_key("volumeup"),
            Self::VolumeDown => injector.press_key("volumedown"),
            Self::TypeChar(c) => injector.type_text(c.encode_utf8(&mut [0; 4])),
            Self::Space => injector.press_key("space"),
            Self::Backspace => injector.press_key("backspace"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click => f.write_str("click"),
            Self::ZoomIn => f.write_str("zoom in"),
            Self::ZoomOut => f.write_str("zoom out"),
            Self::Scroll(amount) => write!(f, "scroll {amount:+}"),
            Self::VolumeUp => f.write_str("volume up"),
            Self::VolumeDown => f.write_str("volume down"),
            Self::TypeChar(c) => write!(f, "type {c:?}"),
            Self::Space => f.write_str("space"),
            Self::Backspace => f.write_str("backspace"),
        }
    }
}

/// Perform `action`, logging instead of propagating a failure
///
/// Returns whether the injector accepted the action.
pub fn dispatch(injector: &dyn InputInjector, action: &Action) -> bool {
    match action.perform(injector) {
        Ok(()) => {
            debug!("Performed {action}");
            true
        }
        Err(e) => {
            warn!("Failed to perform {action}: {e}");
            false
        }
    }
}

/// X keysym for a key name or single character
#[must_use]
pub fn keysym_for_name(name: &str) -> Option<u32> {
    let keysym = match name.to_lowercase().as_str() {
        "ctrl" | "control" | "ctrlleft" => 0xFFE3,
        "shift" | "shiftleft" => 0xFFE1,
        "alt" | "altleft" => 0xFFE9,
        "space" => 0x0020,
        "backspace" => 0xFF08,
        "enter" | "return" => 0xFF0D,
        "tab" => 0xFF09,
        "esc" | "escape" => 0xFF1B,
        "volumeup" => 0x1008_FF13,
        "volumedown" => 0x1008_FF11,
        "volumemute" => 0x1008_FF12,
        _ => {
            let mut chars = name.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(keysym_for_char(c)),
                _ => None,
            };
        }
    };
    Some(keysym)
}

/// X keysym for a character: Latin-1 maps directly, the rest uses the Unicode range
#[must_use]
pub fn keysym_for_char(c: char) -> u32 {
    match c {
        '\n' => 0xFF0D,
        '\t' => 0xFF09,
        c if u32::from(c) <= 0xFF => u32::from(c),
        c => 0x0100_0000 | u32::from(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keysym_names() {
        assert_eq!(keysym_for_name("space"), Some(0x20));
        assert_eq!(keysym_for_name("BackSpace"), Some(0xFF08));
        assert_eq!(keysym_for_name("volumeup"), Some(0x1008_FF13));
        assert_eq!(keysym_for_name("+"), Some(u32::from('+')));
        assert_eq!(keysym_for_name("A"), Some(0x41));
        assert_eq!(keysym_for_name("nosuchkey"), None);
    }

    #[test]
    fn test_keysym_for_char() {
        assert_eq!(keysym_for_char('A'), 0x41);
        assert_eq!(keysym_for_char('é'), 0xE9);
        assert_eq!(keysym_for_char('€'), 0x0100_20AC);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Scroll(-50).to_string(), "scroll -50");
        assert_eq!(Action::TypeChar('Q').to_string(), "type 'Q'");
    }
}
