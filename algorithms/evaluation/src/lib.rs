//! Evaluation of binary classifiers over a labeled test table.
//!
//! Every test row is classified once and the outcome is recorded in a
//! [`ConfusionMatrix`]. Accuracy, precision, recall and F1 are read off that
//! tally. The free functions [`accuracy`], [`precision`], [`recall`] and
//! [`f1_score`] each run their own full pass; [`evaluate`] derives all four
//! from a single pass.

use churn_helpers::{Dataset, DatasetError, Distance, Float, Label};
use k_nn::{KnnClassifier, KnnError};
use ndarray::ArrayView1;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while evaluating a classifier.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Accuracy divides by the number of test rows.
    #[error("accuracy is undefined for an empty test set")]
    EmptyTestSet,
    /// The test table does not match the classifier's feature space.
    #[error(transparent)]
    Schema(#[from] DatasetError),
    /// The classifier failed on one of the test rows.
    #[error("prediction failed on test row {row}: {source}")]
    Prediction {
        row: usize,
        #[source]
        source: KnnError,
    },
}

/// The interface the evaluator needs from a classifier.
pub trait Classifier<F: Float>: Sync {
    /// Width of the feature vectors the classifier accepts.
    fn n_features(&self) -> usize;

    fn predict(&self, features: ArrayView1<F>) -> Result<Label, KnnError>;
}

impl<F, D> Classifier<F> for KnnClassifier<F, D>
where
    F: Float,
    D: Distance<F>,
{
    fn n_features(&self) -> usize {
        KnnClassifier::n_features(self)
    }

    fn predict(&self, features: ArrayView1<F>) -> Result<Label, KnnError> {
        KnnClassifier::predict(self, features)
    }
}

/// Outcome counts for the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Builds a tally from `(predicted, actual)` pairs.
    pub fn from_pairs<I: IntoIterator<Item = (Label, Label)>>(pairs: I) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut confusion, (predicted, actual)| {
                confusion.record(predicted, actual);
                confusion
            })
    }

    pub fn record(&mut self, predicted: Label, actual: Label) {
        match (predicted, actual) {
            (Label::Positive, Label::Positive) => self.true_positives += 1,
            (Label::Positive, Label::Negative) => self.false_positives += 1,
            (Label::Negative, Label::Negative) => self.true_negatives += 1,
            (Label::Negative, Label::Positive) => self.false_negatives += 1,
        }
    }

    /// Classifies every row of `test` once and tallies the outcomes.
    ///
    /// # Errors
    ///
    /// * `MetricsError::Schema` if `test` and the classifier disagree on the feature count.
    /// * `MetricsError::Prediction` if the classifier fails on a row.
    pub fn tally<F, C>(classifier: &C, test: &Dataset<F>) -> Result<Self, MetricsError>
    where
        F: Float,
        C: Classifier<F> + ?Sized,
    {
        if classifier.n_features() != test.n_features() {
            return Err(DatasetError::SchemaMismatch {
                expected: classifier.n_features(),
                found: test.n_features(),
            }
            .into());
        }

        let predictions = predict_rows(classifier, test)?;
        let confusion =
            Self::from_pairs(predictions.into_iter().zip(test.labels().iter().copied()));
        debug!(
            rows = confusion.total(),
            tp = confusion.true_positives,
            fp = confusion.false_positives,
            tn = confusion.true_negatives,
            fn_ = confusion.false_negatives,
            "confusion tally"
        );
        Ok(confusion)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }

    /// correct / total.
    ///
    /// # Errors
    ///
    /// Returns `MetricsError::EmptyTestSet` when nothing was tallied.
    pub fn accuracy(&self) -> Result<f64, MetricsError> {
        if self.total() == 0 {
            return Err(MetricsError::EmptyTestSet);
        }
        Ok(self.correct() as f64 / self.total() as f64)
    }

    /// TP / (TP + FP), or 0.0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN), or 0.0 when no row is actually positive.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall, or 0.0 when both are 0.
    pub fn f1_score(&self) -> f64 {
        let (precision, recall) = (self.precision(), self.recall());
        if precision + recall == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / (precision + recall)
    }

    pub fn metrics(&self) -> Result<Metrics, MetricsError> {
        Ok(Metrics {
            accuracy: self.accuracy()?,
            precision: self.precision(),
            recall: self.recall(),
            f1_score: self.f1_score(),
            confusion: *self,
        })
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(not(feature = "parallel"))]
fn predict_rows<F, C>(classifier: &C, test: &Dataset<F>) -> Result<Vec<Label>, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    test.samples()
        .enumerate()
        .map(|(row, sample)| {
            classifier
                .predict(sample.features)
                .map_err(|source| MetricsError::Prediction { row, source })
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn predict_rows<F, C>(classifier: &C, test: &Dataset<F>) -> Result<Vec<Label>, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    use rayon::prelude::*;

    let features = test.features();
    (0..test.n_samples())
        .into_par_iter()
        .map(|row| {
            classifier
                .predict(features.row(row))
                .map_err(|source| MetricsError::Prediction { row, source })
        })
        .collect()
}

/// All four metrics of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion: ConfusionMatrix,
}

/// Runs the classifier once over `test` and derives every metric from that pass.
///
/// # Errors
///
/// Fails like [`ConfusionMatrix::tally`], and with `MetricsError::EmptyTestSet`
/// when `test` has no rows.
pub fn evaluate<F, C>(test: &Dataset<F>, classifier: &C) -> Result<Metrics, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    ConfusionMatrix::tally(classifier, test)?.metrics()
}

pub fn accuracy<F, C>(test: &Dataset<F>, classifier: &C) -> Result<f64, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    ConfusionMatrix::tally(classifier, test)?.accuracy()
}

pub fn precision<F, C>(test: &Dataset<F>, classifier: &C) -> Result<f64, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    Ok(ConfusionMatrix::tally(classifier, test)?.precision())
}

pub fn recall<F, C>(test: &Dataset<F>, classifier: &C) -> Result<f64, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    Ok(ConfusionMatrix::tally(classifier, test)?.recall())
}

pub fn f1_score<F, C>(test: &Dataset<F>, classifier: &C) -> Result<f64, MetricsError>
where
    F: Float,
    C: Classifier<F> + ?Sized,
{
    Ok(ConfusionMatrix::tally(classifier, test)?.f1_score())
}
