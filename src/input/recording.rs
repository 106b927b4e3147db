use super::InputInjector;
use crate::error::{AppError, Result};
use log::info;
use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

/// One call received by a [`RecordingInjector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedCall {
    MoveTo(i32, i32),
    Click,
    PressKey(String),
    Scroll(i32),
    TypeText(String),
    Hotkey(Vec<String>),
}

/// Oldest calls are dropped beyond this many
pub const MAX_RECORDED_CALLS: usize = 4096;

/// Injector that logs and records calls instead of touching the display
///
/// Used for `--dry-run` and as a test double. It can be switched into a
/// failing mode to simulate transient injection errors. A move to the
/// position of the previous recorded move is not recorded again, and the
/// history keeps at most [`MAX_RECORDED_CALLS`] entries.
#[derive(Debug)]
pub struct RecordingInjector {
    screen: (u32, u32),
    calls: Mutex<VecDeque<InjectedCall>>,
    failing: AtomicBool,
}

impl RecordingInjector {
    #[must_use]
    pub fn new(screen_width: u32, screen_height: u32) -> Self {
        Self {
            screen: (screen_width, screen_height),
            calls: Mutex::new(VecDeque::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following call fail (and not be recorded) until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all recorded calls
    #[must_use]
    pub fn calls(&self) -> Vec<InjectedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).iter().cloned().collect()
    }

    /// Recorded calls other than pointer moves
    #[must_use]
    pub fn actions(&self) -> Vec<InjectedCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, InjectedCall::MoveTo(..)))
            .collect()
    }

    /// Most recent pointer move
    #[must_use]
    pub fn last_move(&self) -> Option<(i32, i32)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find_map(|call| match call {
                InjectedCall::MoveTo(x, y) => Some((*x, *y)),
                _ => None,
            })
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn record(&self, call: InjectedCall) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InputInjection(format!("Simulated failure for {call:?}")));
        }
        if !matches!(call, InjectedCall::MoveTo(..)) {
            info!("[dry-run] {call:?}");
        }

        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(call, InjectedCall::MoveTo(..)) && calls.back() == Some(&call) {
            return Ok(());
        }
        if calls.len() == MAX_RECORDED_CALLS {
            calls.pop_front();
        }
        calls.push_back(call);
        Ok(())
    }
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl InputInjector for RecordingInjector {
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<()> {
        self.record(InjectedCall::MoveTo(x, y))
    }

    fn click(&self) -> Result<()> {
        self.record(InjectedCall::Click)
    }

    fn press_key(&self, name: &str) -> Result<()> {
        self.record(InjectedCall::PressKey(name.to_string()))
    }

    fn scroll(&self, amount: i32) -> Result<()> {
        self.record(InjectedCall::Scroll(amount))
    }

    fn type_text(&self, text: &str) -> Result<()> {
        self.record(InjectedCall::TypeText(text.to_string()))
    }

    fn hotkey(&self, keys: &[&str]) -> Result<()> {
        self.record(InjectedCall::Hotkey(keys.iter().map(ToString::to_string).collect()))
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok(self.screen)
    }
}
