use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, warn};

use crate::{DatasetError, Float, Label, Sample};

/// How numeric tokens are turned into numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericParsing {
    /// Take the longest numeric prefix of a token and fall back to zero, so
    /// `"3.5kg"` reads as `3.5` and `"abc"` as `0`.
    #[default]
    Lenient,
    /// Every token must be a complete number; anything else fails the load.
    Strict,
}

impl NumericParsing {
    fn parse_float(self, token: &str) -> Option<f64> {
        match self {
            NumericParsing::Lenient => Some(leading_float(token)),
            NumericParsing::Strict => token.parse().ok(),
        }
    }

    fn parse_int(self, token: &str) -> Option<i64> {
        match self {
            NumericParsing::Lenient => Some(leading_int(token)),
            NumericParsing::Strict => token.parse().ok(),
        }
    }
}

fn leading_float(token: &str) -> f64 {
    let token = token.trim();
    (1..=token.len())
        .rev()
        .filter(|&end| token.is_char_boundary(end))
        .find_map(|end| token[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn leading_int(token: &str) -> i64 {
    let token = token.trim_start();
    let sign_len = usize::from(token.starts_with(['+', '-']));
    let digits = token[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return 0;
    }
    token[..sign_len + digits].parse().unwrap_or(if token.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Options controlling how delimited text is read into a [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field separator. The number of separators on the first line fixes the
    /// feature count for the whole table.
    pub delimiter: u8,
    pub numeric: NumericParsing,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            numeric: NumericParsing::Lenient,
        }
    }
}

impl LoadOptions {
    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(Trim::All);
        builder
    }
}

/// An in-memory table of labeled feature vectors.
///
/// Features live in one contiguous `(n_samples, n_features)` matrix, so every
/// row has the same width. The table is never mutated after it is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize),
    serde(crate = "serde_crate")
)]
pub struct Dataset<F>
where
    F: Float,
{
    features: Array2<F>,
    labels: Vec<Label>,
}

impl<F> Dataset<F>
where
    F: Float,
{
    /// Builds a table from a feature matrix and one label per row.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::ShapeMismatch` if the row and label counts differ.
    pub fn from_parts(features: Array2<F>, labels: Vec<Label>) -> Result<Self, DatasetError> {
        if features.nrows() != labels.len() {
            return Err(DatasetError::ShapeMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Loads a comma-separated file with the default options.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        Self::load_with(path, &LoadOptions::default())
    }

    pub fn load_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading dataset");
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Reads a table from any seekable source.
    ///
    /// The source is scanned twice: the first pass fixes the feature count
    /// and the number of records so storage is reserved exactly once, the
    /// second pass parses the values. Each record holds `n_features` numeric
    /// fields followed by an integer label; extra fields are ignored. Records
    /// that have no label field, whose label is neither `0` nor `1`, or that
    /// hold a non-finite feature (`nan`, `inf`, overflow) are skipped.
    ///
    /// # Errors
    ///
    /// * `DatasetError::Io` / `DatasetError::Csv` if the source cannot be read.
    /// * `DatasetError::Allocation` if the table storage cannot be reserved.
    /// * `DatasetError::Parse` if strict parsing meets a non-numeric token.
    pub fn from_reader<R: Read + Seek>(mut reader: R, options: &LoadOptions) -> Result<Self, DatasetError> {
        let (n_features, n_records) = {
            let mut csv_reader = options.reader_builder().from_reader(&mut reader);
            let mut record = StringRecord::new();
            let mut n_features = None;
            let mut n_records = 0usize;
            while csv_reader.read_record(&mut record)? {
                n_features.get_or_insert(record.len().saturating_sub(1));
                n_records += 1;
            }
            (n_features.unwrap_or(0), n_records)
        };
        reader.rewind()?;

        let mut values: Vec<F> = Vec::new();
        values
            .try_reserve_exact(n_records.saturating_mul(n_features))
            .map_err(|source| DatasetError::Allocation { rows: n_records, source })?;
        let mut labels: Vec<Label> = Vec::new();
        labels
            .try_reserve_exact(n_records)
            .map_err(|source| DatasetError::Allocation { rows: n_records, source })?;

        let mut csv_reader = options.reader_builder().from_reader(reader);
        let mut record = StringRecord::new();
        let mut skipped = 0usize;
        while csv_reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());

            let Some(label_token) = record.get(n_features) else {
                warn!(line, fields = record.len(), expected = n_features + 1, "skipping row without a label");
                skipped += 1;
                continue;
            };
            let code = options
                .numeric
                .parse_int(label_token)
                .ok_or_else(|| DatasetError::Parse {
                    line,
                    column: n_features,
                    token: label_token.to_string(),
                })?;
            let Some(label) = Label::from_code(code) else {
                warn!(line, code, "skipping row with a label outside {{0, 1}}");
                skipped += 1;
                continue;
            };

            let row_start = values.len();
            let mut non_finite = None;
            for (column, token) in record.iter().take(n_features).enumerate() {
                let value = options
                    .numeric
                    .parse_float(token)
                    .ok_or_else(|| DatasetError::Parse {
                        line,
                        column,
                        token: token.to_string(),
                    })?;
                match F::from_f64(value) {
                    Some(value) if value.is_finite() => values.push(value),
                    _ => {
                        non_finite = Some(column);
                        break;
                    }
                }
            }
            if let Some(column) = non_finite {
                values.truncate(row_start);
                warn!(line, column, "skipping row with a non-finite feature");
                skipped += 1;
                continue;
            }
            labels.push(label);
        }

        let n_samples = labels.len();
        let features = Array2::from_shape_vec((n_samples, n_features), values).map_err(|_| {
            DatasetError::ShapeMismatch {
                rows: n_samples,
                labels: n_samples,
            }
        })?;
        debug!(n_samples, n_features, skipped, "dataset loaded");
        Ok(Self { features, labels })
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> ArrayView2<'_, F> {
        self.features.view()
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of rows labeled `Positive`.
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|l| l.is_positive()).count()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, F>> {
        (index < self.n_samples()).then(|| self.features.row(index))
    }

    pub fn sample(&self, index: usize) -> Option<Sample<'_, F>> {
        let label = *self.labels.get(index)?;
        Some(Sample::new(self.features.row(index), label))
    }

    /// Iterates over the rows in input order.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = Sample<'_, F>> + '_ {
        self.features
            .rows()
            .into_iter()
            .zip(self.labels.iter())
            .map(|(features, &label)| Sample::new(features, label))
    }

    /// Checks that `other` lives in the same feature space as `self`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::SchemaMismatch` if the feature counts differ.
    pub fn ensure_compatible(&self, other: &Dataset<F>) -> Result<(), DatasetError> {
        if self.n_features() != other.n_features() {
            return Err(DatasetError::SchemaMismatch {
                expected: self.n_features(),
                found: other.n_features(),
            });
        }
        Ok(())
    }

    /// Shuffles the rows with a seeded generator and splits them into a
    /// `(train, test)` pair, with `test_ratio` of the rows (rounded) in the
    /// test table.
    pub fn shuffle_split(&self, test_ratio: f64, seed: u64) -> (Dataset<F>, Dataset<F>) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..self.n_samples()).collect();
        indices.shuffle(&mut rng);

        let ratio = test_ratio.clamp(0.0, 1.0);
        let n_test = ((self.n_samples() as f64) * ratio).round() as usize;
        let (test_idx, train_idx) = indices.split_at(n_test.min(self.n_samples()));
        (self.select(train_idx), self.select(test_idx))
    }

    fn select(&self, indices: &[usize]) -> Dataset<F> {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Releases every row of the table at once.
    pub fn release(self) {
        debug!(n_samples = self.n_samples(), "releasing dataset");
        drop(self);
    }
}
