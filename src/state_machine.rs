//! System state machine driven by face presence and operator commands.
//!
//! The transition logic is the pure function [`step`]; [`StateMachine`] adds
//! the face "last seen" clock on top of it and hands the resulting events
//! back to the caller instead of printing them.

use std::fmt;
use std::time::{Duration, Instant};

/// Overall control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SystemState {
    /// Control disabled
    #[default]
    Off,
    /// Head orientation drives the cursor
    On,
    /// Detection continues, the cursor holds its position
    Frozen,
    /// Face lost for longer than the pause timeout
    Paused,
}

impl SystemState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Frozen => "FROZEN",
            Self::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs the state machine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateInput {
    /// A face was detected this frame
    FaceDetected,
    /// No face this frame; `timed_out` once it has been missing longer than the pause timeout
    FaceMissing { timed_out: bool },
    /// Operator toggled mouse control
    Toggle,
    /// Operator froze the cursor
    Freeze,
    /// Operator released a frozen cursor
    Unfreeze,
}

/// A state change and what caused it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEvent {
    pub from: SystemState,
    pub to: SystemState,
    pub cause: StateInput,
}

impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.cause {
            StateInput::FaceDetected => "face found",
            StateInput::FaceMissing { .. } => "face lost",
            StateInput::Toggle => "toggle",
            StateInput::Freeze => "freeze",
            StateInput::Unfreeze => "unfreeze",
        };
        write!(f, "{} -> {} ({reason})", self.from, self.to)
    }
}

/// Compute the next state for `input`, along with the events it produced
#[must_use]
pub fn step(state: SystemState, input: StateInput) -> (SystemState, Vec<StateEvent>) {
    use StateInput as I;
    use SystemState as S;

    let next = match (state, input) {
        (S::Paused, I::FaceDetected) => S::Off,
        (S::Paused, _) => S::Paused,
        (_, I::FaceMissing { timed_out: true }) => S::Paused,
        (S::On, I::Toggle) => S::Off,
        (S::Off, I::Toggle) => S::On,
        (S::On, I::Freeze) => S::Frozen,
        (S::Frozen, I::Unfreeze) => S::On,
        (current, _) => current,
    };

    let events = if next == state {
        Vec::new()
    } else {
        vec![StateEvent {
            from: state,
            to: next,
            cause: input,
        }]
    };
    (next, events)
}

/// Stateful wrapper tracking the current state and when a face was last seen
#[derive(Debug, Clone)]
pub struct StateMachine {
    state: SystemState,
    last_face_seen: Instant,
    pause_timeout: Duration,
}

impl StateMachine {
    /// Create a machine in `Off`, counting the face as seen right now
    #[must_use]
    pub fn new(pause_timeout: Duration) -> Self {
        Self::new_at(pause_timeout, Instant::now())
    }

    /// Create a machine whose face clock starts at `now`
    #[must_use]
    pub const fn new_at(pause_timeout: Duration, now: Instant) -> Self {
        Self {
            state: SystemState::Off,
            last_face_seen: now,
            pause_timeout,
        }
    }

    pub fn update_face_presence(&mut self, face_detected: bool) -> Vec<StateEvent> {
        self.update_face_presence_at(face_detected, Instant::now())
    }

    /// Feed one frame's face detection result observed at `now`
    pub fn update_face_presence_at(&mut self, face_detected: bool, now: Instant) -> Vec<StateEvent> {
        let input = if face_detected {
            self.last_face_seen = now;
            StateInput::FaceDetected
        } else {
            StateInput::FaceMissing {
                timed_out: now.saturating_duration_since(self.last_face_seen) > self.pause_timeout,
            }
        };
        self.apply(input)
    }

    pub fn toggle_mouse(&mut self) -> Vec<StateEvent> {
        self.apply(StateInput::Toggle)
    }

    pub fn freeze_cursor(&mut self) -> Vec<StateEvent> {
        self.apply(StateInput::Freeze)
    }

    pub fn unfreeze_cursor(&mut self) -> Vec<StateEvent> {
        self.apply(StateInput::Unfreeze)
    }

    #[must_use]
    pub const fn state(&self) -> SystemState {
        self.state
    }

    /// Whether orientation should drive the cursor
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SystemState::On
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == SystemState::Paused
    }

    #[must_use]
    pub const fn pause_timeout(&self) -> Duration {
        self.pause_timeout
    }

    fn apply(&mut self, input: StateInput) -> Vec<StateEvent> {
        let (next, events) = step(self.state, input);
        self.state = next;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SystemState; 4] = [
        SystemState::Off,
        SystemState::On,
        SystemState::Frozen,
        SystemState::Paused,
    ];

    #[test]
    fn test_toggle_cycle() {
        let (s, events) = step(SystemState::Off, StateInput::Toggle);
        assert_eq!(s, SystemState::On);
        assert_eq!(events.len(), 1);
        let (s, _) = step(s, StateInput::Toggle);
        assert_eq!(s, SystemState::Off);
    }

    #[test]
    fn test_paused_ignores_commands() {
        for input in [StateInput::Toggle, StateInput::Freeze, StateInput::Unfreeze] {
            let (s, events) = step(SystemState::Paused, input);
            assert_eq!(s, SystemState::Paused);
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_face_detected_only_leaves_paused() {
        for state in ALL {
            let (s, _) = step(state, StateInput::FaceDetected);
            let expected = if state == SystemState::Paused { SystemState::Off } else { state };
            assert_eq!(s, expected);
        }
    }

    #[test]
    fn test_timeout_pauses_every_state() {
        for state in ALL {
            let (s, _) = step(state, StateInput::FaceMissing { timed_out: true });
            assert_eq!(s, SystemState::Paused);
        }
        let (_, events) = step(SystemState::Paused, StateInput::FaceMissing { timed_out: true });
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_without_timeout_is_noop() {
        for state in ALL {
            let (s, events) = step(state, StateInput::FaceMissing { timed_out: false });
            assert_eq!(s, state);
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_toggle_while_frozen_is_noop() {
        let (s, _) = step(SystemState::Frozen, StateInput::Toggle);
        assert_eq!(s, SystemState::Frozen);
    }

    #[test]
    fn test_event_display() {
        let event = StateEvent {
            from: SystemState::On,
            to: SystemState::Paused,
            cause: StateInput::FaceMissing { timed_out: true },
        };
        assert_eq!(event.to_string(), "ON -> PAUSED (face lost)");
    }

    #[test]
    fn test_pause_after_timeout() {
        let t0 = Instant::now();
        let mut machine = StateMachine::new_at(Duration::from_millis(500), t0);

        assert!(machine
            .update_face_presence_at(false, t0 + Duration::from_millis(500))
            .is_empty());
        assert_eq!(machine.state(), SystemState::Off);

        let events = machine.update_face_presence_at(false, t0 + Duration::from_millis(501));
        assert_eq!(machine.state(), SystemState::Paused);
        assert_eq!(events[0].from, SystemState::Off);
    }
}
