//! Evaluation cost benchmarks.
//!
//! Compares four independent metric passes (one inference per test row per
//! metric) against a single shared confusion tally.
//!
//! Run: cargo bench -p knn-metrics -- evaluate

use churn_helpers::{Dataset, L2Dist, Label};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use k_nn::KnnClassifier;
use knn_metrics::{accuracy, evaluate, f1_score, precision, recall};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

const N_FEATURES: usize = 16;

fn random_table(rng: &mut Xoshiro256Plus, rows: usize) -> Dataset<f64> {
    let features = Array2::from_shape_fn((rows, N_FEATURES), |_| rng.random_range(-3.0..3.0));
    let labels = features
        .rows()
        .into_iter()
        .map(|row| if row.sum() > 0.0 { Label::Positive } else { Label::Negative })
        .collect();
    Dataset::from_parts(features, labels).unwrap()
}

fn bench_metric_passes(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let mut group = c.benchmark_group("evaluate");

    for train_rows in [500, 2000] {
        let train = random_table(&mut rng, train_rows);
        let test = random_table(&mut rng, 200);
        let classifier = KnnClassifier::new(5, train, L2Dist).unwrap();

        group.bench_with_input(
            BenchmarkId::new("four_passes", train_rows),
            &(&test, &classifier),
            |b, (test, classifier)| {
                b.iter(|| {
                    black_box((
                        accuracy(*test, *classifier).unwrap(),
                        precision(*test, *classifier).unwrap(),
                        recall(*test, *classifier).unwrap(),
                        f1_score(*test, *classifier).unwrap(),
                    ))
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("single_pass", train_rows),
            &(&test, &classifier),
            |b, (test, classifier)| b.iter(|| black_box(evaluate(*test, *classifier).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_metric_passes);
criterion_main!(benches);
