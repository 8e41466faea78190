//! Distinct (actual, predicted) mistakes of a classifier.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::dataset::LabeledDataset;
use crate::error::Result;

/// One systematic mistake: rows labelled `actual` were predicted as `predicted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorPair {
    pub actual: String,
    pub predicted: String,
}

impl ErrorPair {
    pub fn new(actual: impl Into<String>, predicted: impl Into<String>) -> Self {
        ErrorPair {
            actual: actual.into(),
            predicted: predicted.into(),
        }
    }

    pub fn matches(&self, actual: &str, predicted: &str) -> bool {
        self.actual == actual && self.predicted == predicted
    }
}

impl fmt::Display for ErrorPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.actual, self.predicted)
    }
}

/// Every distinct mismatch in `ds`, in order of first occurrence.
pub fn extract(ds: &LabeledDataset) -> Result<Vec<ErrorPair>> {
    Ok(distinct_mismatches(ds.label_pairs()?))
}

/// Row-level worker behind [`extract`]: drops matches and null rows, keeps
/// the first occurrence of each pair.
pub fn distinct_mismatches<I>(rows: I) -> Vec<ErrorPair>
where
    I: IntoIterator<Item = Option<(String, String)>>,
{
    let mut seen = HashSet::new();
    rows.into_iter()
        .flatten()
        .filter(|(actual, predicted)| actual != predicted)
        .map(|(actual, predicted)| ErrorPair { actual, predicted })
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}
