use std::cmp::Ordering;

use thiserror::Error;
use tracing::trace;

// These are the core components from our shared library.
use churn_helpers::{Dataset, Distance, Float, L2Dist, Label};

// ndarray is used in the public function signatures.
use ndarray::ArrayView1;

/// Errors that can occur when using the k-NN classifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnnError {
    /// k cannot be zero for a k-NN classifier
    #[error("k cannot be zero for a k-NN classifier")]
    InvalidK,
    /// The query and the training rows live in different feature spaces
    #[error("query has {found} features but the training set has {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Invalid distance comparison (likely due to NaN values in data)
    #[error("invalid distance comparison (likely due to NaN values in data)")]
    InvalidDistance,
    /// The per-query distance buffer could not be allocated
    #[error("could not allocate a distance buffer for {rows} training rows")]
    Allocation { rows: usize },
}

/// One training row ranked against a query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Neighbor<F> {
    /// Row index in the training table.
    pub index: usize,
    pub distance: F,
    pub label: Label,
}

/// Vote counts among the selected neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Votes {
    pub negative: usize,
    pub positive: usize,
}

impl Votes {
    pub fn tally<I: IntoIterator<Item = Label>>(labels: I) -> Self {
        labels.into_iter().fold(Votes::default(), |mut votes, label| {
            match label {
                Label::Negative => votes.negative += 1,
                Label::Positive => votes.positive += 1,
            }
            votes
        })
    }

    /// `Positive` only on a strict majority. Every tie, including an empty
    /// vote, goes to `Negative`.
    pub fn winner(&self) -> Label {
        if self.positive > self.negative {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// A k-Nearest Neighbors (k-NN) classifier for binary labels.
///
/// This classifier predicts the label of a new data point by finding the `k`
/// most similar rows in its training table and taking a majority vote among
/// their labels.
///
/// # Type Parameters
///
/// * `F`: The float type for the features (e.g., `f32`, `f64`).
/// * `D`: The distance metric, which must implement the `Distance` trait.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, D = L2Dist>
where
    F: Float,
    D: Distance<F>,
{
    k: usize,
    training: Dataset<F>,
    distance: D,
}

impl<F, D> KnnClassifier<F, D>
where
    F: Float,
    D: Distance<F>,
{
    /// Creates a new k-NN classifier.
    ///
    /// # Arguments
    ///
    /// * `k`: The number of neighbors to consider for classification. Must be greater than 0.
    /// * `training`: The table the classifier will compare queries against.
    /// * `distance`: An instance of a struct that implements the `Distance` trait (e.g., `L2Dist`).
    ///
    /// # Errors
    ///
    /// Returns `KnnError::InvalidK` if `k` is 0, as this is not a valid configuration.
    pub fn new(k: usize, training: Dataset<F>, distance: D) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK);
        }
        Ok(Self {
            k,
            training,
            distance,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn training(&self) -> &Dataset<F> {
        &self.training
    }

    pub fn n_features(&self) -> usize {
        self.training.n_features()
    }

    /// Gives the training table back, consuming the classifier.
    pub fn into_training(self) -> Dataset<F> {
        self.training
    }

    /// Returns the `min(k, n_samples)` training rows closest to `features`,
    /// nearest first.
    ///
    /// # Errors
    ///
    /// Returns `KnnError::DimensionMismatch` if the query width differs from the training rows.
    /// Returns `KnnError::InvalidDistance` if a distance is NaN.
    /// Returns `KnnError::Allocation` if the distance buffer cannot be allocated.
    pub fn nearest(&self, features: ArrayView1<F>) -> Result<Vec<Neighbor<F>>, KnnError> {
        nearest_neighbors(&self.training, &self.distance, self.k, features)
    }

    /// Labels of the nearest rows, nearest first.
    pub fn neighbor_labels(&self, features: ArrayView1<F>) -> Result<Vec<Label>, KnnError> {
        Ok(self.nearest(features)?.into_iter().map(|n| n.label).collect())
    }

    /// Predicts the label for a new, unseen data point.
    ///
    /// An empty training table yields no votes and therefore `Label::Negative`.
    ///
    /// # Errors
    ///
    /// Same as [`KnnClassifier::nearest`].
    pub fn predict(&self, features: ArrayView1<F>) -> Result<Label, KnnError> {
        let neighbors = self.nearest(features)?;
        let votes = Votes::tally(neighbors.iter().map(|n| n.label));
        trace!(
            negative = votes.negative,
            positive = votes.positive,
            "neighbor vote"
        );
        Ok(votes.winner())
    }
}

/// Predicts the label of `query` from `train` with Euclidean distance, without
/// building a classifier first.
///
/// # Errors
///
/// Returns `KnnError::InvalidK` if `k` is 0, otherwise the errors of
/// [`KnnClassifier::nearest`].
pub fn predict<F: Float>(train: &Dataset<F>, query: ArrayView1<F>, k: usize) -> Result<Label, KnnError> {
    if k == 0 {
        return Err(KnnError::InvalidK);
    }
    let neighbors = nearest_neighbors(train, &L2Dist, k, query)?;
    Ok(Votes::tally(neighbors.iter().map(|n| n.label)).winner())
}

fn nearest_neighbors<F, D>(
    training: &Dataset<F>,
    distance: &D,
    k: usize,
    query: ArrayView1<F>,
) -> Result<Vec<Neighbor<F>>, KnnError>
where
    F: Float,
    D: Distance<F>,
{
    if query.len() != training.n_features() {
        return Err(KnnError::DimensionMismatch {
            expected: training.n_features(),
            found: query.len(),
        });
    }

    // 1. Calculate the "relative distance" (squared Euclidean for L2) from the
    //    query to every training row. It orders rows the same way as the true
    //    distance.
    let n_samples = training.n_samples();
    let mut distances: Vec<(F, usize)> = Vec::new();
    distances
        .try_reserve_exact(n_samples)
        .map_err(|_| KnnError::Allocation { rows: n_samples })?;
    for (index, row) in training.features().rows().into_iter().enumerate() {
        let rdist = distance.rdistance(row, query);
        if rdist.is_nan() {
            return Err(KnnError::InvalidDistance);
        }
        distances.push((rdist, index));
    }

    // 2. Sort ascending. Equal distances compare equal and keep training order.
    distances.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    // 3. Take the top `k` neighbors.
    //    We use `min` to handle cases where k is larger than the training set size.
    let num_neighbors = k.min(distances.len());
    let labels = training.labels();
    Ok(distances[..num_neighbors]
        .iter()
        .map(|&(rdist, index)| Neighbor {
            index,
            distance: distance.rdist_to_dist(rdist),
            label: labels[index],
        })
        .collect())
}
