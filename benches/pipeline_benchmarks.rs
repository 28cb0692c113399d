//! Benchmarks for feature extraction, calibration and per-frame tracking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gaze_tracking::{
    calibration::{CalibrationEngine, CalibrationSample, ScreenPoint},
    config::Config,
    constants::NUM_FACE_LANDMARKS,
    features::{extract_features, eye_aspect_ratio, GazeFeatures},
    landmarks::{FaceLandmarks, LandmarkFrame, Point2},
    tracking::GazeTracker,
};
use rand::{Rng, SeedableRng};

/// A face mesh with small random jitter around a plausible layout
fn random_face(rng: &mut impl Rng) -> FaceLandmarks {
    let points = (0..NUM_FACE_LANDMARKS)
        .map(|_| Point2::new(rng.gen_range(0.3..0.7), rng.gen_range(0.3..0.7)))
        .collect();
    FaceLandmarks::new(points).unwrap()
}

fn grid_samples(rows: usize, cols: usize) -> Vec<CalibrationSample> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    (0..rows * cols)
        .map(|i| {
            let u = (i % cols) as f64 / (cols - 1) as f64;
            let v = (i / cols) as f64 / (rows - 1) as f64;
            let features = GazeFeatures {
                rx: 0.35 + 0.3 * u + rng.gen_range(-0.005..0.005),
                ry: -0.1 + 0.2 * v + rng.gen_range(-0.005..0.005),
                hx: rng.gen_range(-0.05..0.05),
                hy: 1.5 + rng.gen_range(-0.05..0.05),
                ..GazeFeatures::default()
            };
            CalibrationSample {
                features,
                target: ScreenPoint::new(192.0 + 1536.0 * u, 108.0 + 864.0 * v),
            }
        })
        .collect()
}

fn bench_features(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let face = random_face(&mut rng);

    c.bench_function("extract_features", |b| b.iter(|| black_box(extract_features(black_box(&face)))));
    c.bench_function("eye_aspect_ratio", |b| b.iter(|| black_box(eye_aspect_ratio(black_box(&face)))));
}

fn bench_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration");
    let config = Config::default();

    for (rows, cols) in [(4, 4), (5, 5), (8, 8)] {
        let samples = grid_samples(rows, cols);
        group.bench_with_input(BenchmarkId::new("calibrate", rows * cols), &samples, |b, samples| {
            let mut engine = CalibrationEngine::new(config.calibration.clone());
            b.iter(|| {
                engine.calibrate(black_box(samples)).unwrap();
            });
        });
    }

    group.finish();
}

fn bench_tracking(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2);
    let frames: Vec<LandmarkFrame> = (0..100)
        .map(|i| LandmarkFrame::with_face(f64::from(i) / 30.0, random_face(&mut rng)))
        .collect();

    let mut tracker = GazeTracker::new(Config::default()).unwrap();
    tracker.calibrate(&grid_samples(4, 4)).unwrap();

    c.bench_function("process_100_frames", |b| {
        b.iter(|| {
            for frame in &frames {
                black_box(tracker.process(black_box(frame)));
            }
        });
    });
}

criterion_group!(benches, bench_features, bench_calibration, bench_tracking);
criterion_main!(benches);
