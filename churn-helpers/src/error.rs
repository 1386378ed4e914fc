use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while building or comparing datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source could not be opened or read.
    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),
    /// The delimited text itself could not be tokenized.
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
    /// Storage for the table could not be allocated.
    #[error("could not allocate storage for {rows} rows: {source}")]
    Allocation {
        rows: usize,
        #[source]
        source: TryReserveError,
    },
    /// A token was not numeric and strict parsing was requested.
    #[error("line {line}, column {column}: `{token}` is not a valid number")]
    Parse {
        line: u64,
        column: usize,
        token: String,
    },
    /// Feature rows and labels disagree in count.
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },
    /// Two tables describe different feature spaces.
    #[error("datasets have a different number of features: expected {expected}, found {found}")]
    SchemaMismatch { expected: usize, found: usize },
}
