//! Integration tests for the full control pipeline


use std::thread;
use std::time::{Duration, Instant};
use test_helpers::{
    closed_eye_face, face_frame, face_landmarks, frontal_face, neutral_hand_with, recording_injector,
};
use touchless_control::{
    actuator::CursorTarget,
    app::ControlApp,
    config::Config,
    constants::hand,
    input::{Action, InjectedCall},
    source::{Command, Frame, ReplaySource},
    state_machine::SystemState,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn with_commands(mut frame: Frame, commands: &[Command]) -> Frame {
    frame.commands = commands.to_vec();
    frame
}

/// Synthetic poses carry float noise, allow one pixel of truncation error
fn assert_near(target: CursorTarget, x: i32, y: i32) {
    assert!(
        (target.x - x).abs() <= 1 && (target.y - y).abs() <= 1,
        "expected near ({x}, {y}), got ({}, {})",
        target.x,
        target.y
    );
}

fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn test_toggle_then_head_turn_moves_cursor() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector.clone(), t0).unwrap();
    assert_eq!(app.state(), SystemState::Off);
    assert_eq!(app.mapper().target_position(), CursorTarget::new(960, 540));

    // Off: orientation is estimated but the cursor is not driven
    let report = app.process_frame_at(&face_frame(Some(face_landmarks(10.0, 0.0))), t0 + ms(10));
    assert!(report.orientation.is_some());
    assert!(report.target.is_none());

    let report = app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0 + ms(20));
    assert_eq!(report.state, SystemState::On);
    assert_eq!(report.events.len(), 1);
    assert!(app.mapper().is_enabled());

    let report = app.process_frame_at(&face_frame(Some(face_landmarks(10.0, 0.0))), t0 + ms(30));
    let target = report.target.unwrap();
    assert_near(target, 480, 540);
    assert!(wait_until(|| injector.last_move() == Some((target.x, target.y))));

    app.shutdown().unwrap();
}

#[test]
fn test_face_loss_pauses_and_disables_actuation() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector, t0).unwrap();

    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0);
    assert!(app.mapper().is_enabled());

    let report = app.process_frame_at(&face_frame(None), t0 + ms(300));
    assert_eq!(report.state, SystemState::On);

    let report = app.process_frame_at(&face_frame(None), t0 + ms(600));
    assert_eq!(report.state, SystemState::Paused);
    assert!(!app.mapper().is_enabled());

    // Commands are ignored while paused
    let report = app.process_frame_at(&with_commands(face_frame(None), &[Command::Toggle]), t0 + ms(700));
    assert_eq!(report.state, SystemState::Paused);

    // Face returns to OFF, never straight to ON
    let report = app.process_frame_at(&face_frame(Some(frontal_face())), t0 + ms(800));
    assert_eq!(report.state, SystemState::Off);
    assert!(!app.mapper().is_enabled());

    app.shutdown().unwrap();
}

#[test]
fn test_calibrate_uses_last_head_pose() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector, t0).unwrap();
    let turned = face_landmarks(10.0, -5.0);

    // Calibrating before any pose is seen is ignored
    app.process_frame_at(&with_commands(face_frame(None), &[Command::Calibrate]), t0);
    assert!(app.last_angles().is_none());

    app.process_frame_at(
        &with_commands(face_frame(Some(turned.clone())), &[Command::Toggle, Command::Calibrate]),
        t0 + ms(10),
    );
    assert!(app.last_angles().is_some());

    let report = app.process_frame_at(&face_frame(Some(turned)), t0 + ms(20));
    assert_eq!(report.target, Some(CursorTarget::new(960, 540)));

    app.shutdown().unwrap();
}

#[test]
fn test_freeze_holds_target() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector, t0).unwrap();

    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0);
    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Freeze]), t0 + ms(10));
    assert_eq!(app.state(), SystemState::Frozen);
    assert!(!app.mapper().is_enabled());

    let report = app.process_frame_at(&face_frame(Some(face_landmarks(10.0, 0.0))), t0 + ms(20));
    assert!(report.target.is_none());
    assert_eq!(app.mapper().target_position(), CursorTarget::new(960, 540));

    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Unfreeze]), t0 + ms(30));
    assert_eq!(app.state(), SystemState::On);

    app.shutdown().unwrap();
}

#[test]
fn test_long_blink_clicks_once_while_on() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector.clone(), t0).unwrap();

    // No clicks while OFF
    app.process_frame_at(&face_frame(Some(closed_eye_face())), t0);
    app.process_frame_at(&face_frame(Some(closed_eye_face())), t0 + ms(1100));
    assert!(injector.actions().is_empty());

    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0 + ms(1200));

    let mut clicks = 0;
    for step in 0..15 {
        let report = app.process_frame_at(&face_frame(Some(closed_eye_face())), t0 + ms(1300 + step * 100));
        clicks += report.actions.iter().filter(|a| **a == Action::Click).count();
    }
    assert_eq!(clicks, 1);
    assert_eq!(injector.actions(), vec![InjectedCall::Click]);

    app.shutdown().unwrap();
}

#[test]
fn test_closure_started_before_toggle_off_does_not_click_later() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector.clone(), t0).unwrap();

    app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0);

    // Eye closes while ON, then control is switched off in the same frame
    let report = app.process_frame_at(
        &with_commands(face_frame(Some(closed_eye_face())), &[Command::Toggle]),
        t0 + ms(100),
    );
    assert_eq!(report.state, SystemState::Off);

    for step in 0..5 {
        app.process_frame_at(&face_frame(Some(frontal_face())), t0 + ms(1000 + step * 1000));
    }
    let report = app.process_frame_at(&with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]), t0 + ms(5300));
    assert_eq!(report.state, SystemState::On);

    // A fresh closure only starts timing now
    let report = app.process_frame_at(&face_frame(Some(closed_eye_face())), t0 + ms(5400));
    assert!(!report.actions.contains(&Action::Click));
    assert!(injector.actions().is_empty());

    let report = app.process_frame_at(&face_frame(Some(closed_eye_face())), t0 + ms(6400));
    assert_eq!(report.actions, vec![Action::Click]);

    app.shutdown().unwrap();
}

#[test]
fn test_gestures_and_keyboard_toggle() {
    let injector = recording_injector();
    let t0 = Instant::now();
    let mut app = ControlApp::new_at(&Config::default(), injector.clone(), t0).unwrap();
    let scroll_up = neutral_hand_with(hand::MIDDLE_TIP, 0.5, 0.6);

    let frame = Frame {
        right_hand: Some(scroll_up),
        ..face_frame(None)
    };
    let report = app.process_frame_at(&frame, t0);
    assert_eq!(report.actions, vec![Action::Scroll(50)]);

    let report = app.process_frame_at(&with_commands(frame.clone(), &[Command::ToggleKeyboard]), t0 + ms(500));
    assert_eq!(report.actions, vec![Action::Scroll(50)]);
    assert!(app.gestures().is_keyboard_enabled());

    let report = app.process_frame_at(&frame, t0 + ms(1000));
    assert!(report.actions.is_empty());
    assert_eq!(injector.actions(), vec![InjectedCall::Scroll(50), InjectedCall::Scroll(50)]);

    app.shutdown().unwrap();
}

#[test]
fn test_run_replay_until_quit() {
    let injector = recording_injector();
    let mut app = ControlApp::new(&Config::default(), injector).unwrap();

    let frames = vec![
        face_frame(Some(frontal_face())),
        with_commands(face_frame(Some(frontal_face())), &[Command::Quit]),
        face_frame(Some(frontal_face())),
    ];
    let mut source = ReplaySource::from_frames(frames);

    let summary = app.run(&mut source).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(source.len(), 1);
    assert!(summary.fps > 0.0);

    app.shutdown().unwrap();
}

#[test]
fn test_run_yaml_replay() {
    let frames = [
        with_commands(face_frame(Some(frontal_face())), &[Command::Toggle]),
        face_frame(Some(face_landmarks(-10.0, 0.0))),
    ];
    let yaml = frames
        .iter()
        .map(|frame| serde_yaml::to_string(frame).unwrap())
        .collect::<Vec<_>>()
        .join("---\n");

    let injector = recording_injector();
    let mut app = ControlApp::new(&Config::default(), injector.clone()).unwrap();
    let mut source = ReplaySource::from_yaml(&yaml).unwrap();

    let summary = app.run(&mut source).unwrap();
    assert_eq!(summary.frames, 2);
    assert_eq!(app.state(), SystemState::On);
    let target = app.mapper().target_position();
    assert_near(target, 1440, 540);
    assert!(wait_until(|| injector.last_move() == Some((target.x, target.y))));

    app.shutdown().unwrap();
}

#[test]
fn test_run_uses_frame_timestamps() {
    let mut frames = vec![Frame {
        timestamp: Some(0.0),
        ..with_commands(face_frame(Some(frontal_face())), &[Command::Toggle])
    }];
    frames.extend((1..=60).map(|i| Frame {
        timestamp: Some(f64::from(i) / 30.0),
        ..face_frame(Some(closed_eye_face()))
    }));
    let yaml = frames
        .iter()
        .map(|frame| serde_yaml::to_string(frame).unwrap())
        .collect::<Vec<_>>()
        .join("---\n");

    let injector = recording_injector();
    let mut app = ControlApp::new(&Config::default(), injector.clone()).unwrap();
    let mut source = ReplaySource::from_yaml(&yaml).unwrap();

    // Two recorded seconds replay in far less wall time
    let summary = app.run(&mut source).unwrap();
    assert_eq!(summary.frames, 61);
    assert_eq!(summary.actions, 1);
    assert_eq!(injector.actions(), vec![InjectedCall::Click]);

    app.shutdown().unwrap();
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.actuator.rate_hz = -1.0;
    assert!(ControlApp::new(&config, recording_injector()).is_err());
}
