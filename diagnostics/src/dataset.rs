//! Result datasets with an explicit (actual, predicted) label contract.

use polars::prelude::*;

use crate::error::{ReportError, Result};

/// A classification result: features plus one column of true labels and one
/// of predicted labels.
///
/// Label values are compared through their string rendering after casting
/// both columns to a common dtype, so `1` and `1` match whatever the integer
/// width. Numeric labels never match string labels.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    frame: DataFrame,
    actual: PlSmallStr,
    predicted: PlSmallStr,
    label_dtype: DataType,
}

impl LabeledDataset {
    /// Use the last two columns as (actual, predicted), in that order.
    pub fn from_trailing_columns(frame: DataFrame) -> Result<Self> {
        let width = frame.width();
        if width < 2 {
            return Err(ReportError::TooFewColumns { found: width });
        }
        let names = frame.get_column_names_owned();
        let actual = names[width - 2].clone();
        let predicted = names[width - 1].clone();
        Self::validated(frame, actual, predicted)
    }

    /// Name the label columns explicitly; they may sit anywhere in the frame.
    pub fn new(frame: DataFrame, actual: &str, predicted: &str) -> Result<Self> {
        if frame.width() < 2 {
            return Err(ReportError::TooFewColumns { found: frame.width() });
        }
        Self::validated(frame, actual.into(), predicted.into())
    }

    fn validated(frame: DataFrame, actual: PlSmallStr, predicted: PlSmallStr) -> Result<Self> {
        if actual == predicted {
            return Err(ReportError::SameLabelColumn(actual.to_string()));
        }
        let actual_dtype = label_column(&frame, &actual)?.dtype();
        let predicted_dtype = label_column(&frame, &predicted)?.dtype();
        let Some(label_dtype) = common_label_dtype(actual_dtype, predicted_dtype) else {
            return Err(ReportError::LabelTypeMismatch {
                actual: actual.to_string(),
                actual_dtype: actual_dtype.to_string(),
                predicted: predicted.to_string(),
                predicted_dtype: predicted_dtype.to_string(),
            });
        };
        Ok(LabeledDataset {
            frame,
            actual,
            predicted,
            label_dtype,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn actual_column(&self) -> &str {
        self.actual.as_str()
    }

    pub fn predicted_column(&self) -> &str {
        self.predicted.as_str()
    }

    /// Per-row (actual, predicted); `None` where either label is null.
    pub fn label_pairs(&self) -> Result<Vec<Option<(String, String)>>> {
        let actual = self.label_strings(&self.actual)?;
        let predicted = self.label_strings(&self.predicted)?;
        let pairs = actual
            .str()?
            .into_iter()
            .zip(predicted.str()?.into_iter())
            .map(|(a, p)| match (a, p) {
                (Some(a), Some(p)) => Some((a.to_string(), p.to_string())),
                _ => None,
            })
            .collect();
        Ok(pairs)
    }

    fn label_strings(&self, name: &PlSmallStr) -> Result<Column> {
        Ok(self
            .frame
            .column(name.as_str())?
            .cast(&self.label_dtype)?
            .cast(&DataType::String)?)
    }

    /// Per-row "was the prediction right"; rows with a null label count as wrong.
    pub fn correctness(&self) -> Result<Vec<bool>> {
        Ok(self
            .label_pairs()?
            .into_iter()
            .map(|pair| matches!(pair, Some((a, p)) if a == p))
            .collect())
    }

    /// A copy with rows in the given order. The label contract carries over.
    pub fn reordered(&self, order: &[IdxSize]) -> Result<Self> {
        if order.len() != self.height() {
            return Err(ReportError::ShapeMismatch {
                what: "row order",
                expected: self.height(),
                found: order.len(),
            });
        }
        let idx = IdxCa::from_vec("order".into(), order.to_vec());
        Ok(LabeledDataset {
            frame: self.frame.take(&idx)?,
            actual: self.actual.clone(),
            predicted: self.predicted.clone(),
            label_dtype: self.label_dtype.clone(),
        })
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

/// Dtype both label columns are cast to before comparison; `None` when they
/// cannot be compared.
fn common_label_dtype(actual: &DataType, predicted: &DataType) -> Option<DataType> {
    if actual == predicted {
        Some(actual.clone())
    } else if actual.is_integer() && predicted.is_integer() {
        Some(DataType::Int64)
    } else if is_numeric(actual) && is_numeric(predicted) {
        Some(DataType::Float64)
    } else {
        None
    }
}

fn label_column<'a>(frame: &'a DataFrame, name: &PlSmallStr) -> Result<&'a Column> {
    frame
        .column(name.as_str())
        .map_err(|_| ReportError::MissingColumn(name.to_string()))
}

/// Values of a column as `f64`, nulls kept as `None`.
///
/// Dates and datetimes go through their physical integer representation.
/// Returns `None` for columns that have no numeric reading (strings,
/// booleans, nested types).
pub fn numeric_values(series: &Series) -> Option<Vec<Option<f64>>> {
    let physical = series.to_physical_repr();
    match physical.dtype() {
        DataType::String | DataType::Boolean | DataType::Binary | DataType::Null => return None,
        DataType::List(_) => return None,
        _ => {}
    }
    let cast = physical.cast(&DataType::Float64).ok()?;
    let values = cast.f64().ok()?.into_iter().collect();
    Some(values)
}
