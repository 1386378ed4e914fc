use std::fs;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use churn_knn::{
    Dataset, DatasetError, KnnClassifier, L2Dist, Label, MetricsError, accuracy, evaluate,
    f1_score, precision, predict, recall,
};
use churn_knn::ndarray::array;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_exact_matches_score_perfectly() {
    let dir = tempfile::tempdir().unwrap();
    let rows = "0.0,0.0,0\n1.0,5.0,1\n4.0,4.0,1\n9.0,1.0,0\n";
    let train = Dataset::<f64>::load(write_csv(&dir, "train.csv", rows)).unwrap();
    let test = Dataset::<f64>::load(write_csv(&dir, "test.csv", rows)).unwrap();
    train.ensure_compatible(&test).unwrap();

    let classifier = KnnClassifier::new(1, train, L2Dist).unwrap();
    let metrics = evaluate(&test, &classifier).unwrap();

    assert_abs_diff_eq!(metrics.accuracy, 1.0);
    assert_abs_diff_eq!(metrics.precision, 1.0);
    assert_abs_diff_eq!(metrics.recall, 1.0);
    assert_abs_diff_eq!(metrics.f1_score, 1.0);
    assert_eq!(metrics.confusion.correct(), 4);
}

#[test]
fn test_single_query_scenarios() {
    let dir = tempfile::tempdir().unwrap();

    let train = Dataset::<f64>::load(write_csv(&dir, "pair.csv", "0,0,0\n10,10,1\n")).unwrap();
    assert_eq!(predict(&train, array![1.0, 1.0].view(), 1).unwrap(), Label::Negative);

    let tied = Dataset::<f64>::load(write_csv(&dir, "tied.csv", "0,0,0\n0,0,1\n")).unwrap();
    assert_eq!(predict(&tied, array![0.0, 0.0].view(), 2).unwrap(), Label::Negative);
}

#[test]
fn test_separated_clusters() {
    let dir = tempfile::tempdir().unwrap();
    let train = "\
1.0,1.0,0
1.5,0.5,0
0.5,1.5,0
8.0,8.0,1
8.5,7.5,1
7.5,8.5,1
";
    let test = "\
1.2,1.1,0
7.9,8.1,1
0.0,0.0,0
9.0,9.0,1
5.0,5.0,0
";
    let train = Dataset::<f64>::load(write_csv(&dir, "train.csv", train)).unwrap();
    let test = Dataset::<f64>::load(write_csv(&dir, "test.csv", test)).unwrap();
    let classifier = KnnClassifier::new(3, train, L2Dist).unwrap();

    // (5,5) is closer to the positive cluster, so it is the single false positive.
    assert_abs_diff_eq!(accuracy(&test, &classifier).unwrap(), 0.8);
    assert_abs_diff_eq!(precision(&test, &classifier).unwrap(), 2.0 / 3.0);
    assert_abs_diff_eq!(recall(&test, &classifier).unwrap(), 1.0);
    assert_abs_diff_eq!(f1_score(&test, &classifier).unwrap(), 0.8, epsilon = 1e-12);
}

#[test]
fn test_feature_count_mismatch_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let train = Dataset::<f64>::load(write_csv(&dir, "train.csv", "1,2,0\n")).unwrap();
    let test = Dataset::<f64>::load(write_csv(&dir, "test.csv", "1,2,3,0\n")).unwrap();

    assert!(matches!(
        train.ensure_compatible(&test),
        Err(DatasetError::SchemaMismatch { expected: 2, found: 3 })
    ));

    let classifier = KnnClassifier::new(1, train, L2Dist).unwrap();
    assert!(matches!(
        evaluate(&test, &classifier),
        Err(MetricsError::Schema(DatasetError::SchemaMismatch { .. }))
    ));
}

#[test]
fn test_empty_test_file() {
    let dir = tempfile::tempdir().unwrap();
    let train = Dataset::<f64>::load(write_csv(&dir, "train.csv", "1,0\n")).unwrap();
    let test = Dataset::<f64>::load(write_csv(&dir, "test.csv", "")).unwrap();
    assert!(test.is_empty());

    // An empty file has no first line to take a feature count from.
    assert!(train.ensure_compatible(&test).is_err());

    // Every row skipped: no samples, but the width of the first line is kept.
    let all_skipped = Dataset::<f64>::load(write_csv(&dir, "skipped.csv", "1,2,7\n")).unwrap();
    assert!(all_skipped.is_empty());
    assert_eq!(all_skipped.n_features(), 2);
}

#[test]
fn test_unreadable_training_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Dataset::<f64>::load(dir.path().join("nope.csv"));
    assert!(matches!(result, Err(DatasetError::Io(_))));
}

#[test]
fn test_seeded_holdout_of_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = String::new();
    for i in 0..10 {
        let offset = f64::from(i) * 0.1;
        rows.push_str(&format!("{offset},{offset},0\n{},{},1\n", 20.0 + offset, 20.0 + offset));
    }
    let all = Dataset::<f64>::load(write_csv(&dir, "all.csv", &rows)).unwrap();

    let (train, test) = all.shuffle_split(0.25, 42);
    assert_eq!(train.n_samples(), 15);
    assert_eq!(test.n_samples(), 5);
    assert_eq!(all.shuffle_split(0.25, 42).1.labels(), test.labels());
    all.release();

    let classifier = KnnClassifier::new(3, train, L2Dist).unwrap();
    let metrics = evaluate(&test, &classifier).unwrap();
    assert_abs_diff_eq!(metrics.accuracy, 1.0);
}
