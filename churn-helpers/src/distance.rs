use ndarray::ArrayView1;

use crate::Float;

/// A dissimilarity measure between two feature vectors of equal length.
///
/// `rdistance` is a reduced form that preserves the ordering of `distance` and
/// is cheaper to compute; `rdist_to_dist` converts one into the other.
pub trait Distance<F: Float>: Clone + Send + Sync {
    /// # Panics
    ///
    /// Panics if `a` and `b` have different lengths.
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.distance(a, b)
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }
}

/// Euclidean distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    /// Sum of squared coordinate differences.
    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        assert_eq!(
            a.len(),
            b.len(),
            "feature vectors must have the same length"
        );
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| {
                let diff = x - y;
                diff * diff
            })
            .sum()
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }
}
