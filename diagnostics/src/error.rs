//! Error type shared by the report pipeline.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Everything that can stop a report from being assembled.
///
/// Structural variants describe a malformed report and are never recovered
/// from. Rendering problems do not show up here: renderers degrade to a
/// placeholder artifact instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("result block `{block}` has no split, it was already assembled")]
    MissingSplit { block: String },

    #[error("result block `{block}` has not been assembled yet")]
    NotAssembled { block: String },

    #[error("dataset needs at least two columns (actual, predicted), found {found}")]
    TooFewColumns { found: usize },

    #[error("column `{0}` not found")]
    MissingColumn(String),

    #[error("column `{0}` cannot hold both the actual and the predicted labels")]
    SameLabelColumn(String),

    #[error("label columns `{actual}` ({actual_dtype}) and `{predicted}` ({predicted_dtype}) differ in type")]
    LabelTypeMismatch {
        actual: String,
        actual_dtype: String,
        predicted: String,
        predicted_dtype: String,
    },

    #[error("{what}: expected {expected} rows, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("probe classifier: {0}")]
    Probe(String),

    #[error("render: {0}")]
    Render(String),

    #[error("artifact decode: {0}")]
    Decode(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// True for violations of the report's shape, as opposed to I/O or
    /// library failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ReportError::MissingSplit { .. }
                | ReportError::NotAssembled { .. }
                | ReportError::TooFewColumns { .. }
                | ReportError::MissingColumn(_)
                | ReportError::SameLabelColumn(_)
                | ReportError::LabelTypeMismatch { .. }
                | ReportError::ShapeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
