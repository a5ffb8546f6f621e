use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use resume_scorer::explainability::{FeatureNameResolver, StageKind};
use resume_scorer::training::RandomForestRegressor;

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>() * 10.0);
    let y = x.rows().into_iter().map(|row| row.sum() + rng.gen::<f64>() * 0.1).collect();
    (x, y)
}

fn bench_forest_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest");
    group.sample_size(10);

    for n_rows in [500, 2000].iter() {
        let (x, y) = create_regression_data(*n_rows, 10);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &(x, y), |b, (x, y)| {
            b.iter(|| {
                let mut forest = RandomForestRegressor::new(20).with_max_depth(8);
                forest.fit(black_box(x), black_box(y)).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_resolve_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for width in [100, 5000].iter() {
        let columns: Vec<String> = (0..*width).map(|i| format!("feature_{}", i)).collect();
        let importances: Vec<f64> = (0..*width).map(|i| ((i * 7919) % 1000) as f64).collect();
        let resolver = FeatureNameResolver::new();

        group.bench_with_input(BenchmarkId::new("named", width), &columns, |b, columns| {
            b.iter(|| {
                let stages = [StageKind::Passthrough { columns }];
                resolver.resolve_stages(black_box(&stages), black_box(&importances))
            })
        });

        group.bench_with_input(BenchmarkId::new("fallback", width), &columns, |b, columns| {
            b.iter(|| {
                let stages = [StageKind::Passthrough { columns: &columns[1..] }];
                resolver.resolve_stages(black_box(&stages), black_box(&importances))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_forest_fit, bench_resolve_stages);
criterion_main!(benches);
