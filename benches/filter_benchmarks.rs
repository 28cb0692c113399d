//! Benchmarks for smoothing filter performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gaze_tracking::filters::{
    dead_zone::DeadZoneFilter, exponential::ExponentialFilter, moving_average::MovingAverageFilter,
    NoFilter, SmoothingFilter,
};

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    // Test data - simulating noisy gaze points on a 1920x1080 screen
    let test_data: Vec<(f64, f64)> = (0..100)
        .map(|i| {
            let t = i as f64 * 0.1;
            let x = 960.0 + 600.0 * t.sin() + 20.0 * rand::random::<f64>();
            let y = 540.0 + 300.0 * t.cos() + 20.0 * rand::random::<f64>();
            (x, y)
        })
        .collect();

    let filter_configs = vec![
        ("no_filter", Box::new(NoFilter) as Box<dyn SmoothingFilter>),
        ("moving_average_5", Box::new(MovingAverageFilter::new(5))),
        ("moving_average_10", Box::new(MovingAverageFilter::new(10))),
        ("exponential_0.3", Box::new(ExponentialFilter::new(0.3))),
        ("exponential_0.8", Box::new(ExponentialFilter::new(0.8))),
        ("dead_zone_15", Box::new(DeadZoneFilter::new(15.0))),
    ];

    for (name, mut filter) in filter_configs {
        group.bench_with_input(BenchmarkId::new("single_update", name), &test_data[0], |b, &(x, y)| {
            b.iter(|| black_box(filter.apply(black_box(x), black_box(y))));
        });

        group.bench_with_input(BenchmarkId::new("sequence_100", name), &test_data, |b, data| {
            b.iter(|| {
                filter.reset();
                for &(x, y) in data {
                    black_box(filter.apply(black_box(x), black_box(y)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_filter_chain(c: &mut Criterion) {
    let data: Vec<(f64, f64)> = (0..1000)
        .map(|i| {
            let t = f64::from(i) * 0.01;
            let noise_x = f64::from((i * 17) % 11) / 11.0 - 0.5;
            let noise_y = f64::from((i * 13) % 7) / 7.0 - 0.5;
            (960.0 + (t * 2.0).sin() * 500.0 + noise_x * 30.0, 540.0 + (t * 1.5).cos() * 300.0 + noise_y * 30.0)
        })
        .collect();

    c.bench_function("predictor_chain_1000", |b| {
        let mut chain: [Box<dyn SmoothingFilter>; 3] = [
            Box::new(ExponentialFilter::new(0.3)),
            Box::new(MovingAverageFilter::new(5)),
            Box::new(DeadZoneFilter::new(15.0)),
        ];
        b.iter(|| {
            for stage in &mut chain {
                stage.reset();
            }
            for &(x, y) in &data {
                let mut p = (x, y);
                for stage in &mut chain {
                    p = stage.apply(p.0, p.1);
                }
                black_box(p);
            }
        });
    });
}

criterion_group!(benches, benchmark_filters, benchmark_filter_chain);
criterion_main!(benches);
