use ndarray::NdFloat;

use num_traits::FromPrimitive;

use std::iter::Sum;

// Include submodules
mod common;
mod dataset;
mod distance;
mod error;

// Re-export types from submodules
pub use common::{Label, Sample};
pub use dataset::{Dataset, LoadOptions, NumericParsing};
pub use distance::{Distance, L2Dist};
pub use error::DatasetError;

/// Feature scalar accepted by the loader and the distance functions.
pub trait Float: NdFloat + FromPrimitive + Sum {}

impl Float for f32 {}

impl Float for f64 {}
