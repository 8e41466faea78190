//! Null/non-null layout of a frame, the raw material of every missingness figure.

use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct NullityMask {
    pub columns: Vec<String>,
    pub rows: usize,
    /// Column-major: `missing[c][r]` is true when row `r` of column `c` is null.
    pub missing: Vec<Vec<bool>>,
}

impl NullityMask {
    pub fn from_frame(frame: &DataFrame) -> Self {
        let mut columns = Vec::with_capacity(frame.width());
        let mut missing = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            columns.push(column.name().to_string());
            missing.push(column.is_null().into_iter().map(|v| v.unwrap_or(true)).collect());
        }
        NullityMask {
            columns,
            rows: frame.height(),
            missing,
        }
    }

    /// Fraction of present values per column.
    pub fn completeness(&self) -> Vec<f64> {
        self.missing
            .iter()
            .map(|col| {
                if self.rows == 0 {
                    return 0.0;
                }
                let present = col.iter().filter(|&&m| !m).count();
                present as f64 / self.rows as f64
            })
            .collect()
    }

    /// Columns that are neither complete nor entirely empty; only these carry
    /// a nullity signal to correlate.
    pub fn partially_missing(&self) -> Vec<usize> {
        self.missing
            .iter()
            .enumerate()
            .filter(|(_, col)| col.iter().any(|&m| m) && !col.iter().all(|&m| m))
            .map(|(i, _)| i)
            .collect()
    }

    /// Fraction of rows in which columns `a` and `b` disagree on nullity.
    pub fn disagreement(&self, a: usize, b: usize) -> f64 {
        if self.rows == 0 {
            return 0.0;
        }
        let differ = self.missing[a]
            .iter()
            .zip(&self.missing[b])
            .filter(|(x, y)| x != y)
            .count();
        differ as f64 / self.rows as f64
    }

    pub fn indicator(&self, column: usize) -> Vec<Option<f64>> {
        self.missing[column]
            .iter()
            .map(|&m| Some(if m { 1.0 } else { 0.0 }))
            .collect()
    }
}
