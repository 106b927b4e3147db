//! Benchmarks for orientation estimation, mapping and classification

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector3;
use std::sync::Arc;
use std::time::{Duration, Instant};
use touchless_control::{
    actuator::SharedCursor,
    blink::eye_aspect_ratio,
    config::{CursorConfig, GestureConfig, KeyboardConfig},
    constants::{face, hand, NUM_FACE_LANDMARKS, NUM_HAND_LANDMARKS},
    cursor_mapping::CursorMapper,
    filters::{SmoothingMode, SmoothingWindow},
    gestures::GestureClassifier,
    input::RecordingInjector,
    landmarks::{Landmark, LandmarkSet},
    orientation::OrientationEstimator,
};

/// Face mesh with the head turned by `turn` degrees, in a square frame
fn face_landmarks(turn: f64) -> LandmarkSet {
    let (sin, cos) = turn.to_radians().sin_cos();
    let mut set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5, 0.0); NUM_FACE_LANDMARKS]);
    set.set(face::LEFT_CHEEK, Landmark::new(0.5 - 0.2 * cos, 0.5, 0.2 * sin));
    set.set(face::RIGHT_CHEEK, Landmark::new(0.5 + 0.2 * cos, 0.5, -0.2 * sin));
    set.set(face::TOP_OF_HEAD, Landmark::new(0.5, 0.2, 0.0));
    set.set(face::CHIN, Landmark::new(0.5, 0.8, 0.0));

    let eye = [(0.30, 0.40), (0.33, 0.39), (0.37, 0.39), (0.40, 0.40), (0.37, 0.41), (0.33, 0.41)];
    for (index, (x, y)) in face::LEFT_EYE.into_iter().zip(eye) {
        set.set(index, Landmark::new(x, y, 0.0));
    }
    set
}

fn hand_landmarks(index_y: f64) -> LandmarkSet {
    let mut set = LandmarkSet::new(vec![Landmark::default(); NUM_HAND_LANDMARKS]);
    set.set(hand::WRIST, Landmark::new(0.5, 0.9, 0.0));
    set.set(hand::MIDDLE_KNUCKLE, Landmark::new(0.45, 0.7, 0.0));
    set.set(hand::THUMB_TIP, Landmark::new(0.35, 0.5, 0.0));
    set.set(hand::INDEX_TIP, Landmark::new(0.40, index_y, 0.0));
    set.set(hand::MIDDLE_TIP, Landmark::new(0.5, 0.5, 0.0));
    set.set(hand::RING_TIP, Landmark::new(0.55, 0.52, 0.0));
    set.set(hand::LITTLE_TIP, Landmark::new(0.6, 0.56, 0.0));
    set
}

fn benchmark_orientation(c: &mut Criterion) {
    let mut group = c.benchmark_group("orientation");
    let estimator = OrientationEstimator::new();

    for turn in [0.0, 15.0, -30.0] {
        let landmarks = face_landmarks(turn);
        group.bench_with_input(BenchmarkId::new("estimate", turn), &landmarks, |b, landmarks| {
            b.iter(|| black_box(estimator.estimate(black_box(landmarks), 480, 480)));
        });
    }

    let landmarks = face_landmarks(0.0);
    group.bench_function("eye_aspect_ratio", |b| {
        b.iter(|| black_box(eye_aspect_ratio(black_box(&landmarks), 480, 480)));
    });

    group.finish();
}

fn benchmark_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");

    // Deterministic sweep of head angles around neutral
    let samples: Vec<(f64, f64)> = (0..100)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            (180.0 + 8.0 * t.sin(), 180.0 + 15.0 * (t * 0.7).cos())
        })
        .collect();
    let forward = Vector3::new(0.05, -0.02, 1.0).normalize();

    for mode in [SmoothingMode::Off, SmoothingMode::Window] {
        let config = CursorConfig {
            smoothing: mode,
            ..CursorConfig::default()
        };
        let mut mapper = CursorMapper::new(&config, 1920, 1080, SharedCursor::default());
        mapper.set_enabled(true);

        group.bench_with_input(BenchmarkId::new("update_sequence_100", format!("{mode:?}")), &samples, |b, data| {
            b.iter(|| {
                for &(pitch, yaw) in data {
                    black_box(mapper.update(black_box(pitch), black_box(yaw), &forward));
                }
            });
        });
    }

    group.bench_function("window_mean_direction", |b| {
        let mut window = SmoothingWindow::new(8);
        for i in 0..8 {
            window.push(Vector3::new(f64::from(i) * 0.01, 0.0, 1.0));
        }
        b.iter(|| black_box(window.mean_direction()));
    });

    group.finish();
}

fn benchmark_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("gestures");
    let injector = Arc::new(RecordingInjector::default());

    let gesture_config = GestureConfig {
        cooldown: 0.0,
        ..GestureConfig::default()
    };
    let mut gestures = GestureClassifier::new(&gesture_config, &KeyboardConfig::default(), injector.clone());
    let hand = hand_landmarks(0.5);
    let start = Instant::now();
    let mut frame = 0u32;

    group.bench_function("classify_neutral_hand", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            let now = start + Duration::from_millis(u64::from(frame));
            black_box(gestures.process_at(Some(&hand), None, now))
        });
    });

    let keyboard = KeyboardConfig {
        enabled: true,
        ..KeyboardConfig::default()
    };
    let mut dial = GestureClassifier::new(&GestureConfig::default(), &keyboard, injector);
    group.bench_function("dial_update", |b| {
        b.iter(|| black_box(dial.process_at(Some(&hand), None, start)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_orientation, benchmark_mapping, benchmark_gestures);
criterion_main!(benches);
