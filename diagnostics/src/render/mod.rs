//! Rendering seam of the pipeline.
//!
//! Every method turns typed input into a finished [`ImageArtifact`]. Inputs a
//! renderer cannot draw produce a placeholder artifact and a warning, never an
//! error, so one odd column does not abort a report.

pub mod cluster;
pub mod correlation;
pub mod histogram;
mod missing;
pub mod nullity;
mod precision_recall;
mod surface;

use polars::prelude::*;
use tracing::warn;

use crate::artifact::ImageArtifact;
use crate::curve::PrecisionRecallCurve;
use crate::dataset::numeric_values;
use crate::style::RenderStyle;

pub use correlation::CorrelationMatrix;
use correlation::CorrelationFigure;
use histogram::{Bins, HistogramFigure};
use missing::{BarFigure, DendrogramFigure, MatrixFigure};
pub use nullity::NullityMask;
use precision_recall::PrecisionRecallFigure;
use surface::{render_figure, Figure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramOptions {
    pub bins: usize,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        HistogramOptions { bins: 10 }
    }
}

pub trait Renderer {
    fn histogram(&self, series: &Series, options: &HistogramOptions) -> ImageArtifact;

    fn mini_histogram(&self, series: &Series, options: &HistogramOptions) -> ImageArtifact;

    fn correlation_matrix(&self, matrix: &CorrelationMatrix, title: &str) -> ImageArtifact;

    /// `wrong` flags misclassified rows; present cells of those rows are
    /// highlighted.
    fn missing_matrix(&self, frame: &DataFrame, wrong: Option<&[bool]>) -> ImageArtifact;

    fn missing_bar(&self, frame: &DataFrame) -> ImageArtifact;

    fn missing_heat(&self, frame: &DataFrame) -> ImageArtifact;

    fn missing_dendrogram(&self, frame: &DataFrame) -> ImageArtifact;

    fn precision_recall(&self, curve: &PrecisionRecallCurve) -> ImageArtifact;
}

/// Renderer drawing with plotters in the configured [`RenderStyle`].
#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    style: RenderStyle,
}

impl PlottersRenderer {
    pub fn new(style: RenderStyle) -> Self {
        PlottersRenderer { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    fn render<F: Figure>(&self, kind: &str, figure: &F, size: (u32, u32)) -> ImageArtifact {
        match render_figure(figure, &self.style, size) {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Could not render {}: {}; using a placeholder", kind, e);
                ImageArtifact::placeholder()
            }
        }
    }

    fn histogram_figure<'a>(&self, series: &'a Series, options: &HistogramOptions, mini: bool) -> HistogramFigure<'a> {
        let bins = match numeric_values(series) {
            Some(values) => {
                let values: Vec<f64> = values.into_iter().flatten().collect();
                Bins::compute(&values, options.bins)
            }
            None => {
                warn!("Column `{}` ({}) has no numeric reading, drawing empty axes", series.name(), series.dtype());
                None
            }
        };
        HistogramFigure {
            name: series.name().as_str(),
            bins,
            mini,
        }
    }
}

impl Renderer for PlottersRenderer {
    fn histogram(&self, series: &Series, options: &HistogramOptions) -> ImageArtifact {
        let figure = self.histogram_figure(series, options, false);
        self.render("histogram", &figure, self.style.figure_size)
    }

    fn mini_histogram(&self, series: &Series, options: &HistogramOptions) -> ImageArtifact {
        let figure = self.histogram_figure(series, options, true);
        self.render("mini histogram", &figure, self.style.mini_size)
    }

    fn correlation_matrix(&self, matrix: &CorrelationMatrix, title: &str) -> ImageArtifact {
        if matrix.is_empty() {
            warn!("Correlation matrix `{}` is empty; using a placeholder", title);
            return ImageArtifact::placeholder();
        }
        let figure = CorrelationFigure { matrix, title };
        self.render("correlation matrix", &figure, self.style.matrix_size)
    }

    fn missing_matrix(&self, frame: &DataFrame, wrong: Option<&[bool]>) -> ImageArtifact {
        let mask = NullityMask::from_frame(frame);
        let figure = MatrixFigure { mask: &mask, wrong };
        self.render("missing matrix", &figure, self.style.matrix_size)
    }

    fn missing_bar(&self, frame: &DataFrame) -> ImageArtifact {
        let mask = NullityMask::from_frame(frame);
        self.render("missing bar", &BarFigure { mask: &mask }, self.style.matrix_size)
    }

    fn missing_heat(&self, frame: &DataFrame) -> ImageArtifact {
        let mask = NullityMask::from_frame(frame);
        let columns = mask.partially_missing();
        if columns.len() < 2 {
            warn!("Fewer than two partially missing columns, no nullity correlation to draw");
            return ImageArtifact::placeholder();
        }
        let labels = columns.iter().map(|&c| mask.columns[c].clone()).collect();
        let indicators: Vec<Vec<Option<f64>>> = columns.iter().map(|&c| mask.indicator(c)).collect();
        let matrix = CorrelationMatrix::pearson(labels, &indicators);
        self.correlation_matrix(&matrix, "Nullity correlation")
    }

    fn missing_dendrogram(&self, frame: &DataFrame) -> ImageArtifact {
        let mask = NullityMask::from_frame(frame);
        self.render("missing dendrogram", &DendrogramFigure { mask: &mask }, self.style.matrix_size)
    }

    fn precision_recall(&self, curve: &PrecisionRecallCurve) -> ImageArtifact {
        self.render(
            "precision-recall curve",
            &PrecisionRecallFigure { curve },
            self.style.figure_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "a" => [Some(1.0), None, Some(3.0), None],
            "b" => [Some(2.0), None, Some(1.0), Some(5.0)],
            "c" => ["x", "y", "z", "w"],
        )
        .unwrap()
    }

    // Text needs system fonts; without them plotters fails and the renderer
    // degrades. Either way the artifact must be a well-formed svg data URI.
    fn assert_svg(artifact: &ImageArtifact) {
        assert_eq!(artifact.media_subtype(), Some("svg+xml"));
        let svg = String::from_utf8(artifact.decode().unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_every_figure_yields_an_artifact() {
        let renderer = PlottersRenderer::default();
        let df = frame();
        let options = HistogramOptions::default();
        let series = df.column("a").unwrap().as_materialized_series().clone();

        assert_svg(&renderer.histogram(&series, &options));
        assert_svg(&renderer.mini_histogram(&series, &options));
        assert_svg(&renderer.missing_matrix(&df, Some(&[false, true, false, false])));
        assert_svg(&renderer.missing_bar(&df));
        assert_svg(&renderer.missing_heat(&df));
        assert_svg(&renderer.missing_dendrogram(&df));
    }

    #[test]
    fn test_string_histogram_degrades() {
        let renderer = PlottersRenderer::default();
        let series = Series::new("s".into(), &["a", "b"]);
        assert_svg(&renderer.histogram(&series, &HistogramOptions::default()));
    }

    #[test]
    fn test_heat_without_partial_columns_is_placeholder() {
        let renderer = PlottersRenderer::default();
        let df = df!("a" => [1, 2], "b" => [3, 4]).unwrap();
        assert!(renderer.missing_heat(&df).is_placeholder());
    }

    #[test]
    fn test_single_column_dendrogram_is_placeholder() {
        let renderer = PlottersRenderer::default();
        let df = df!("a" => [Some(1), None]).unwrap();
        assert!(renderer.missing_dendrogram(&df).is_placeholder());
    }
}
