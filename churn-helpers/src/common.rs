use ndarray::ArrayView1;
use crate::Float;
use std::fmt::{Display, Formatter};

/// The binary outcome attached to every record.
///
/// `Negative` is code `0` (no churn), `Positive` is code `1` (churn). Any other
/// code has no representation, so a table can never carry a label that the
/// vote would have to ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Label {
    #[default]
    Negative,
    Positive,
}

impl Label {
    /// Maps an integer label code onto a `Label`. Only `0` and `1` are valid.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Label::Negative),
            1 => Some(Label::Positive),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Label::Negative => 0,
            Label::Positive => 1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Positive
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Negative => write!(f, "No Churn (No)"),
            Label::Positive => write!(f, "Churn (Yes)"),
        }
    }
}

/// A single row of a [`Dataset`](crate::Dataset): its features and its label.
///
/// Samples are borrowed views; the table keeps ownership of the underlying
/// storage.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a, F>
where
    F: Float,
{
    pub features: ArrayView1<'a, F>,
    pub label: Label,
}

impl<'a, F> Sample<'a, F>
where
    F: Float,
{
    pub fn new(features: ArrayView1<'a, F>, label: Label) -> Self {
        Sample { features, label }
    }
}
