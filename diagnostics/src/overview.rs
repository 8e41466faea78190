//! Whole-dataset figures of the prepared frame: missingness summaries,
//! correlations and per-variable histograms.

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::artifact::ImageArtifact;
use crate::dataset::numeric_values;
use crate::render::{CorrelationMatrix, HistogramOptions, Renderer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariablePlots {
    pub name: String,
    pub histogram: ImageArtifact,
    pub mini_histogram: ImageArtifact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub missing_bar: ImageArtifact,
    pub missing_heat: ImageArtifact,
    pub missing_dendrogram: ImageArtifact,
    /// Pearson correlation of the numeric columns; absent with fewer than two.
    pub correlation: Option<ImageArtifact>,
    pub variables: Vec<VariablePlots>,
}

pub fn build_overview<R: Renderer + ?Sized>(renderer: &R, frame: &DataFrame) -> DatasetOverview {
    info!("Building overview of {} rows x {} columns", frame.height(), frame.width());
    let options = HistogramOptions::default();

    let mut numeric_labels = Vec::new();
    let mut numeric_columns = Vec::new();
    let mut variables = Vec::with_capacity(frame.width());

    for column in frame.get_columns() {
        let series = column.as_materialized_series();
        if let Some(values) = numeric_values(series) {
            numeric_labels.push(series.name().to_string());
            numeric_columns.push(values);
        }
        debug!("Histograms for `{}`", series.name());
        variables.push(VariablePlots {
            name: series.name().to_string(),
            histogram: renderer.histogram(series, &options),
            mini_histogram: renderer.mini_histogram(series, &options),
        });
    }

    let correlation = (numeric_columns.len() >= 2).then(|| {
        let matrix = CorrelationMatrix::pearson(numeric_labels, &numeric_columns);
        renderer.correlation_matrix(&matrix, "Pearson")
    });

    DatasetOverview {
        missing_bar: renderer.missing_bar(frame),
        missing_heat: renderer.missing_heat(frame),
        missing_dendrogram: renderer.missing_dendrogram(frame),
        correlation,
        variables,
    }
}
