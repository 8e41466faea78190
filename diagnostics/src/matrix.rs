//! Named missingness matrices, optionally reordered around one mistake.

use polars::prelude::IdxSize;
use serde::Serialize;
use tracing::debug;

use crate::artifact::ImageArtifact;
use crate::dataset::LabeledDataset;
use crate::error::Result;
use crate::error_pairs::{extract, ErrorPair};
use crate::render::Renderer;

pub const ORIGINAL_DATASET: &str = "Original Dataset";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticMatrix {
    pub name: String,
    pub image: ImageArtifact,
}

pub struct MatrixBuilder<'r, R: Renderer + ?Sized> {
    renderer: &'r R,
}

impl<'r, R: Renderer + ?Sized> MatrixBuilder<'r, R> {
    pub fn new(renderer: &'r R) -> Self {
        MatrixBuilder { renderer }
    }

    /// The dataset as-is, rows annotated by prediction correctness.
    pub fn build_original(&self, ds: &LabeledDataset) -> Result<DiagnosticMatrix> {
        Ok(DiagnosticMatrix {
            name: ORIGINAL_DATASET.to_string(),
            image: self.annotated(ds)?,
        })
    }

    /// Rows showing `pair` first, everything else after; `ds` is untouched.
    pub fn build_for_pair(&self, ds: &LabeledDataset, pair: &ErrorPair) -> Result<DiagnosticMatrix> {
        let labels = ds.label_pairs()?;
        let order = partition_order(&labels, pair);
        let reordered = ds.reordered(&order)?;
        debug!("Matrix for {}: {} of {} rows match", pair, matching_rows(&labels, pair), ds.height());
        Ok(DiagnosticMatrix {
            name: pair.to_string(),
            image: self.annotated(&reordered)?,
        })
    }

    /// `[original] + [one matrix per distinct mistake]`.
    pub fn build_all(&self, ds: &LabeledDataset) -> Result<Vec<DiagnosticMatrix>> {
        let pairs = extract(ds)?;
        let mut matrices = Vec::with_capacity(1 + pairs.len());
        matrices.push(self.build_original(ds)?);
        for pair in &pairs {
            matrices.push(self.build_for_pair(ds, pair)?);
        }
        Ok(matrices)
    }

    fn annotated(&self, ds: &LabeledDataset) -> Result<ImageArtifact> {
        let wrong: Vec<bool> = ds.correctness()?.into_iter().map(|ok| !ok).collect();
        Ok(self.renderer.missing_matrix(ds.frame(), Some(&wrong)))
    }
}

/// Stable partition: indices of rows equal to `pair`, then the rest, each
/// group in its original order.
pub fn partition_order(labels: &[Option<(String, String)>], pair: &ErrorPair) -> Vec<IdxSize> {
    let is_match = |row: &Option<(String, String)>| matches!(row, Some((a, p)) if pair.matches(a, p));
    let (mut head, tail): (Vec<IdxSize>, Vec<IdxSize>) = (0..labels.len() as IdxSize)
        .partition(|&i| is_match(&labels[i as usize]));
    head.extend(tail);
    head
}

fn matching_rows(labels: &[Option<(String, String)>], pair: &ErrorPair) -> usize {
    labels
        .iter()
        .filter(|row| matches!(row, Some((a, p)) if pair.matches(a, p)))
        .count()
}
