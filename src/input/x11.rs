//! Input injection for X11-based systems.
//!
//! Pointer moves use `WarpPointer` from the core protocol; clicks, wheel
//! steps and key presses are synthesized with the XTEST extension. Key names
//! are resolved to keysyms and then to keycodes through the server's keyboard
//! mapping, holding Shift for keysyms that live on the shifted level.

use super::{keysym_for_char, keysym_for_name, InputInjector};
use crate::error::{AppError, Result};
use log::{debug, info};
use std::collections::HashMap;
use x11rb::{
    connection::{Connection, RequestConnection},
    protocol::{
        xproto::{self, ConnectionExt as _, Keycode, Screen},
        xtest::{self, ConnectionExt as _},
    },
    rust_connection::RustConnection,
};

const LEFT_BUTTON: u8 = 1;
const WHEEL_UP_BUTTON: u8 = 4;
const WHEEL_DOWN_BUTTON: u8 = 5;
const SHIFT_KEYSYM: u32 = 0xFFE1;

/// Keycode for a keysym and whether Shift must be held to produce it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyStroke {
    keycode: Keycode,
    shifted: bool,
}

/// Input injector talking to an X server
pub struct X11Injector {
    connection: RustConnection,
    screen: Screen,
    keymap: HashMap<u32, KeyStroke>,
}

impl X11Injector {
    /// Connect to the display named by `$DISPLAY`
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be opened, the screen is
    /// missing, XTEST is unavailable or the keyboard mapping cannot be read.
    pub fn new() -> Result<Self> {
        info!("Initializing X11 input injector");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| AppError::X11(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| AppError::X11("Failed to get screen".to_string()))?
            .clone();

        connection
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(|e| AppError::X11(format!("Failed to query XTEST: {e}")))?
            .ok_or_else(|| AppError::X11("XTEST extension is not available".to_string()))?;

        let keymap = Self::load_keymap(&connection)?;

        info!(
            "Connected to X11 display, screen: {}x{}, {} keysyms mapped",
            screen.width_in_pixels,
            screen.height_in_pixels,
            keymap.len()
        );

        Ok(Self {
            connection,
            screen,
            keymap,
        })
    }

    fn load_keymap(connection: &RustConnection) -> Result<HashMap<u32, KeyStroke>> {
        let setup = connection.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = connection
            .get_keyboard_mapping(min, max - min + 1)
            .map_err(|e| AppError::X11(format!("Failed to request keyboard mapping: {e}")))?
            .reply()
            .map_err(|e| AppError::X11(format!("Failed to read keyboard mapping: {e}")))?;

        Ok(build_keymap(min, reply.keysyms_per_keycode, &reply.keysyms))
    }

    fn stroke_for(&self, keysym: u32) -> Result<KeyStroke> {
        self.keymap
            .get(&keysym)
            .copied()
            .ok_or_else(|| AppError::InputInjection(format!("No keycode for keysym {keysym:#x}")))
    }

    fn fake(&self, event_type: u8, detail: u8) -> Result<()> {
        self.connection
            .xtest_fake_input(event_type, detail, x11rb::CURRENT_TIME, x11rb::NONE, 0, 0, 0)
            .map_err(|e| AppError::InputInjection(format!("Failed to send fake input: {e}")))?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.connection
            .flush()
            .map_err(|e| AppError::X11(format!("Failed to flush connection: {e}")))
    }

    fn button_click(&self, button: u8) -> Result<()> {
        self.fake(xproto::BUTTON_PRESS_EVENT, button)?;
        self.fake(xproto::BUTTON_RELEASE_EVENT, button)
    }

    fn key_down(&self, stroke: KeyStroke) -> Result<()> {
        if stroke.shifted {
            self.fake(xproto::KEY_PRESS_EVENT, self.stroke_for(SHIFT_KEYSYM)?.keycode)?;
        }
        self.fake(xproto::KEY_PRESS_EVENT, stroke.keycode)
    }

    fn key_up(&self, stroke: KeyStroke) -> Result<()> {
        self.fake(xproto::KEY_RELEASE_EVENT, stroke.keycode)?;
        if stroke.shifted {
            self.fake(xproto::KEY_RELEASE_EVENT, self.stroke_for(SHIFT_KEYSYM)?.keycode)?;
        }
        Ok(())
    }

    fn tap(&self, keysym: u32) -> Result<()> {
        let stroke = self.stroke_for(keysym)?;
        self.key_down(stroke)?;
        self.key_up(stroke)
    }

    fn named_keysym(name: &str) -> Result<u32> {
        keysym_for_name(name).ok_or_else(|| AppError::InputInjection(format!("Unknown key name: {name}")))
    }
}

impl InputInjector for X11Injector {
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<()> {
        let max_x = i32::from(self.screen.width_in_pixels.saturating_sub(1));
        let max_y = i32::from(self.screen.height_in_pixels.saturating_sub(1));
        let x = i16::try_from(x.clamp(0, max_x)).unwrap_or(i16::MAX);
        let y = i16::try_from(y.clamp(0, max_y)).unwrap_or(i16::MAX);

        debug!("Setting cursor position to ({}, {})", x, y);

        self.connection
            .warp_pointer(x11rb::NONE, self.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| AppError::InputInjection(format!("Failed to warp pointer: {e}")))?;
        self.flush()
    }

    fn click(&self) -> Result<()> {
        self.button_click(LEFT_BUTTON)?;
        self.flush()
    }

    fn press_key(&self, name: &str) -> Result<()> {
        self.tap(Self::named_keysym(name)?)?;
        self.flush()
    }

    fn scroll(&self, amount: i32) -> Result<()> {
        let button = if amount >= 0 { WHEEL_UP_BUTTON } else { WHEEL_DOWN_BUTTON };
        for _ in 0..amount.unsigned_abs() {
            self.button_click(button)?;
        }
        self.flush()
    }

    fn type_text(&self, text: &str) -> Result<()> {
        for c in text.chars() {
            self.tap(keysym_for_char(c))?;
        }
        self.flush()
    }

    fn hotkey(&self, keys: &[&str]) -> Result<()> {
        let strokes = keys
            .iter()
            .map(|name| Self::named_keysym(name).and_then(|keysym| self.stroke_for(keysym)))
            .collect::<Result<Vec<_>>>()?;

        for stroke in &strokes {
            self.key_down(*stroke)?;
        }
        for stroke in strokes.iter().rev() {
            self.key_up(*stroke)?;
        }
        self.flush()
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok((
            u32::from(self.screen.width_in_pixels),
            u32::from(self.screen.height_in_pixels),
        ))
    }
}

/// Build a keysym lookup from a `GetKeyboardMapping` reply
///
/// Only the first two levels (plain and shifted) of the first group are
/// considered; the plain level wins when a keysym appears on both.
fn build_keymap(min_keycode: Keycode, keysyms_per_keycode: u8, keysyms: &[u32]) -> HashMap<u32, KeyStroke> {
    let per = usize::from(keysyms_per_keycode);
    let mut keymap = HashMap::new();
    if per == 0 {
        return keymap;
    }

    for level in 0..per.min(2) {
        for (offset, row) in keysyms.chunks(per).enumerate() {
            let keysym = row.get(level).copied().unwrap_or(0);
            let Ok(offset) = u8::try_from(offset) else {
                break;
            };
            if keysym == 0 {
                continue;
            }
            keymap.entry(keysym).or_insert(KeyStroke {
                keycode: min_keycode.saturating_add(offset),
                shifted: level == 1,
            });
        }
    }
    keymap
}
