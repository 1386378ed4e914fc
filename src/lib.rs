//! k-nearest-neighbor classification of binary-labeled records.
//!
//! ```no_run
//! use churn_knn::{Dataset, KnnClassifier, L2Dist, evaluate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let train = Dataset::<f64>::load("train.csv")?;
//! let test = Dataset::<f64>::load("test.csv")?;
//! train.ensure_compatible(&test)?;
//!
//! let classifier = KnnClassifier::new(5, train, L2Dist)?;
//! let metrics = evaluate(&test, &classifier)?;
//! println!("accuracy {:.4}", metrics.accuracy);
//! # Ok(())
//! # }
//! ```

pub use ndarray;

pub use churn_helpers::{
    Dataset, DatasetError, Distance, Float, L2Dist, Label, LoadOptions, NumericParsing, Sample,
};
pub use k_nn::{KnnClassifier, KnnError, Neighbor, Votes, predict};
pub use knn_metrics::{
    Classifier, ConfusionMatrix, Metrics, MetricsError, accuracy, evaluate, f1_score, precision,
    recall,
};
