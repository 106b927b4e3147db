//! Cursor actuation: a periodic thread that moves the pointer to the latest target.
//!
//! The mapping stage writes a [`CursorTarget`] into a [`SharedCursor`]; the
//! actuation thread copies it out at a fixed rate and issues an absolute
//! move while actuation is enabled. Writes are last-write-wins and the lock
//! is only held for the copy.

use crate::input::InputInjector;
use crate::{Error, Result};
use crossbeam_channel::{bounded, tick, Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long `Drop` waits for the thread when `shutdown` was not called
const DROP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Desired absolute pointer position in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorTarget {
    pub x: i32,
    pub y: i32,
}

impl CursorTarget {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Target position and enabled flag shared between mapping and actuation
#[derive(Debug, Clone, Default)]
pub struct SharedCursor {
    target: Arc<Mutex<CursorTarget>>,
    enabled: Arc<AtomicBool>,
}

impl SharedCursor {
    /// Create a disabled handle pointing at `initial`
    #[must_use]
    pub fn new(initial: CursorTarget) -> Self {
        Self {
            target: Arc::new(Mutex::new(initial)),
            enabled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self, target: CursorTarget) {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner) = target;
    }

    #[must_use]
    pub fn load(&self) -> CursorTarget {
        *self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}

/// Handle to the running actuation thread
pub struct CursorActuator {
    running: Arc<AtomicBool>,
    done: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl CursorActuator {
    /// Start the actuation thread polling `cursor` every `interval`
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn(cursor: SharedCursor, injector: Arc<dyn InputInjector>, interval: Duration) -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let (done_tx, done) = bounded::<()>(1);

        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("cursor-actuator".to_string())
            .spawn(move || {
                actuation_loop(&cursor, injector.as_ref(), interval, &thread_running);
                let _ = done_tx.send(());
            })?;

        info!("Cursor actuator started ({:.0} Hz)", 1.0 / interval.as_secs_f64().max(f64::EPSILON));

        Ok(Self {
            running,
            done,
            handle: Some(handle),
        })
    }

    /// Whether the thread has been started and not yet stopped
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Acquire)
    }

    /// Stop the loop and wait at most `timeout` for the thread to exit
    ///
    /// # Errors
    ///
    /// Returns an error if the thread did not stop in time or panicked
    pub fn shutdown(&mut self, timeout: Duration) -> Result<()> {
        self.running.store(false, Ordering::Release);

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                handle
                    .join()
                    .map_err(|_| Error::Actuator("Actuation thread panicked".to_string()))?;
                info!("Cursor actuator stopped");
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => Err(Error::Actuator(format!(
                "Actuation thread did not stop within {timeout:?}"
            ))),
        }
    }
}

impl Drop for CursorActuator {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown(DROP_SHUTDOWN_TIMEOUT) {
            warn!("{e}");
        }
    }
}

fn actuation_loop(cursor: &SharedCursor, injector: &dyn InputInjector, interval: Duration, running: &AtomicBool) {
    let ticker = tick(interval);
    let mut failing = false;

    while running.load(Ordering::Acquire) {
        if ticker.recv().is_err() {
            break;
        }
        if !running.load(Ordering::Acquire) || !cursor.is_enabled() {
            continue;
        }

        let target = cursor.load();
        match injector.move_cursor_to(target.x, target.y) {
            Ok(()) => {
                if failing {
                    info!("Cursor moves succeeding again");
                    failing = false;
                }
            }
            Err(e) if failing => debug!("Cursor move failed: {e}"),
            Err(e) => {
                warn!("Cursor move failed: {e}");
                failing = true;
            }
        }
    }
}
