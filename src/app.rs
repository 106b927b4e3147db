//! Main application logic for touchless control

use crate::{
    actuator::{CursorActuator, CursorTarget, SharedCursor},
    blink::BlinkClassifier,
    config::Config,
    cursor_mapping::CursorMapper,
    gestures::GestureClassifier,
    input::{Action, InputInjector},
    orientation::{Orientation, OrientationEstimator},
    source::{Command, Frame, LandmarkSource},
    state_machine::{StateEvent, StateMachine, SystemState},
    utils::FpsCounter,
    Result,
};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// What happened while processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub state: SystemState,
    pub face_detected: bool,
    pub orientation: Option<Orientation>,
    /// Cursor target published this frame, if any
    pub target: Option<CursorTarget>,
    /// One-shot actions emitted by the blink and gesture classifiers
    pub actions: Vec<Action>,
    pub events: Vec<StateEvent>,
    /// Set when the frame carried a quit command
    pub quit: bool,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub actions: u64,
    pub fps: f64,
}

/// Touchless control pipeline: state machine, mapping, actuation and classifiers
pub struct ControlApp {
    state_machine: StateMachine,
    estimator: OrientationEstimator,
    mapper: CursorMapper,
    blink: Option<BlinkClassifier>,
    gestures: GestureClassifier,
    actuator: CursorActuator,
    shutdown_timeout: std::time::Duration,
    last_angles: Option<(f64, f64)>,
    fps: FpsCounter,
}

impl ControlApp {
    /// Create the pipeline and start the actuation thread
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the screen size
    /// cannot be queried or the actuation thread cannot be started
    pub fn new(config: &Config, injector: Arc<dyn InputInjector>) -> Result<Self> {
        Self::new_at(config, injector, Instant::now())
    }

    /// Like [`ControlApp::new`] with the state machine clock starting at `now`
    ///
    /// # Errors
    ///
    /// See [`ControlApp::new`]
    pub fn new_at(config: &Config, injector: Arc<dyn InputInjector>, now: Instant) -> Result<Self> {
        info!("Initializing touchless control");
        config.validate()?;

        let (screen_width, screen_height) = injector.screen_size()?;
        info!("Screen size: {screen_width}x{screen_height}");

        let cursor = SharedCursor::default();
        let mapper = CursorMapper::new(&config.cursor, screen_width, screen_height, cursor.clone());
        let actuator = CursorActuator::spawn(cursor, Arc::clone(&injector), config.actuator.interval())?;

        let blink = if config.blink.enabled {
            Some(BlinkClassifier::new(&config.blink, Arc::clone(&injector)))
        } else {
            info!("Blink clicks disabled");
            None
        };
        let gestures = GestureClassifier::new(&config.gestures, &config.keyboard, injector);

        Ok(Self {
            state_machine: StateMachine::new_at(config.state.pause_timeout(), now),
            estimator: OrientationEstimator::new(),
            mapper,
            blink,
            gestures,
            actuator,
            shutdown_timeout: config.actuator.shutdown_timeout(),
            last_angles: None,
            fps: FpsCounter::new_at(now),
        })
    }

    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        self.process_frame_at(frame, Instant::now())
    }

    /// Run one frame through the pipeline
    pub fn process_frame_at(&mut self, frame: &Frame, now: Instant) -> FrameReport {
        let face_detected = frame.face.is_some();
        let mut events = self.state_machine.update_face_presence_at(face_detected, now);
        self.sync_actuation(&events);

        let mut orientation = None;
        let mut target = None;
        let mut actions = Vec::new();

        if let Some(face) = &frame.face {
            orientation = self.estimator.estimate(face, frame.width, frame.height);
            match orientation {
                Some(o) => {
                    self.last_angles = Some((o.pitch, o.yaw));
                    if self.state_machine.is_active() {
                        target = self.mapper.update(o.pitch, o.yaw, &o.forward);
                    }
                }
                None => debug!("Face landmarks incomplete, skipping orientation"),
            }

            let clicking = self.blink_armed();
            if let Some(blink) = self.blink.as_mut().filter(|_| clicking) {
                actions.extend(blink.process_at(face, frame.width, frame.height, now));
            }
        }

        actions.extend(
            self.gestures
                .process_at(frame.right_hand.as_ref(), frame.left_hand.as_ref(), now),
        );

        let mut quit = false;
        for command in &frame.commands {
            let command_events = self.handle_command(*command);
            self.sync_actuation(&command_events);
            events.extend(command_events);
            quit |= *command == Command::Quit;
        }

        FrameReport {
            state: self.state_machine.state(),
            face_detected,
            orientation,
            target,
            actions,
            events,
            quit,
        }
    }

    fn handle_command(&mut self, command: Command) -> Vec<StateEvent> {
        debug!("Command: {command:?}");
        match command {
            Command::Toggle => self.state_machine.toggle_mouse(),
            Command::Freeze => self.state_machine.freeze_cursor(),
            Command::Unfreeze => self.state_machine.unfreeze_cursor(),
            Command::Calibrate => {
                match self.last_angles {
                    Some((pitch, yaw)) => {
                        self.mapper.calibrate(yaw, pitch);
                        info!("Calibrated at yaw={yaw:.1} pitch={pitch:.1}");
                    }
                    None => warn!("Cannot calibrate before a head pose has been seen"),
                }
                Vec::new()
            }
            Command::ToggleKeyboard => {
                self.gestures.toggle_keyboard();
                Vec::new()
            }
            Command::Quit => {
                info!("Quit requested");
                Vec::new()
            }
        }
    }

    /// Blink clicks are only classified while ON or FROZEN
    fn blink_armed(&self) -> bool {
        matches!(self.state_machine.state(), SystemState::On | SystemState::Frozen)
    }

    /// Log transitions, enable actuation exactly while the state is On and
    /// drop any eye closure in progress once blinks stop being classified
    fn sync_actuation(&mut self, events: &[StateEvent]) {
        for event in events {
            info!("State: {event}");
        }
        self.mapper.set_enabled(self.state_machine.is_active());

        if !self.blink_armed() {
            if let Some(blink) = self.blink.as_mut() {
                blink.reset();
            }
        }
    }

    /// Process frames until the source is exhausted or a quit command arrives
    ///
    /// Frames carrying a timestamp are processed at that offset from the
    /// start of the run, the others at the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails
    pub fn run(&mut self, source: &mut dyn LandmarkSource) -> Result<RunSummary> {
        info!("Starting main loop");
        let mut summary = RunSummary::default();
        let start = Instant::now();

        while let Some(frame) = source.next_frame()? {
            let now = frame
                .offset()
                .and_then(|offset| start.checked_add(offset))
                .unwrap_or_else(Instant::now);
            let report = self.process_frame_at(&frame, now);
            summary.frames += 1;
            summary.actions += report.actions.len() as u64;
            summary.fps = self.fps.tick();
            debug!(
                "Frame {}: state={} face={} fps={:.1}",
                summary.frames, report.state, report.face_detected, summary.fps
            );

            if report.quit {
                break;
            }
        }

        info!("Processed {} frames, {} actions", summary.frames, summary.actions);
        Ok(summary)
    }

    /// Stop the actuation thread
    ///
    /// # Errors
    ///
    /// Returns an error if the thread does not stop within the configured timeout
    pub fn shutdown(&mut self) -> Result<()> {
        info!("Application shutting down");
        self.mapper.set_enabled(false);
        self.actuator.shutdown(self.shutdown_timeout)
    }

    #[must_use]
    pub const fn state(&self) -> SystemState {
        self.state_machine.state()
    }

    #[must_use]
    pub const fn mapper(&self) -> &CursorMapper {
        &self.mapper
    }

    #[must_use]
    pub const fn gestures(&self) -> &GestureClassifier {
        &self.gestures
    }

    /// Raw (pitch, yaw) of the most recent head pose
    #[must_use]
    pub const fn last_angles(&self) -> Option<(f64, f64)> {
        self.last_angles
    }
}
