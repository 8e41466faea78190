use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingBackend;

use super::surface::{DrawResult, Figure};
use crate::style::{rgb, RenderStyle};

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Bins {
    /// `None` for an empty sample. A constant sample gets a unit-wide range
    /// centred on its value.
    pub fn compute(values: &[f64], bin_count: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bin_count == 0 {
            return None;
        }
        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / bin_count as f64;
        let mut counts = vec![0; bin_count];
        for v in finite {
            let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
            counts[idx] += 1;
        }
        Some(Bins { start: min, width, counts })
    }

    pub fn end(&self) -> f64 {
        self.start + self.width * self.counts.len() as f64
    }
}

pub(crate) struct HistogramFigure<'a> {
    pub name: &'a str,
    /// `None` when the column could not be read as numbers; drawn as empty axes.
    pub bins: Option<Bins>,
    pub mini: bool,
}

impl Figure for HistogramFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (x_range, y_max) = match &self.bins {
            Some(bins) => {
                let peak = bins.counts.iter().copied().max().unwrap_or(0);
                (bins.start..bins.end(), (peak.max(1) as f64) * 1.05)
            }
            None => (0.0..1.0, 1.0),
        };

        let mut builder = ChartBuilder::on(root);
        builder.margin(10).x_label_area_size(30).y_label_area_size(40);
        if !self.mini {
            builder.caption(self.name, style.text(style.title_size));
        }
        let mut chart = builder.build_cartesian_2d(x_range, 0f64..y_max)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().label_style(style.text(style.label_size));
        if self.mini {
            mesh.x_labels(3).y_labels(0);
        } else {
            mesh.y_desc("Frequency");
        }
        mesh.draw()?;

        if let Some(bins) = &self.bins {
            let colour = rgb(style.histogram_color);
            chart.draw_series(bins.counts.iter().enumerate().map(|(i, &count)| {
                let x0 = bins.start + i as f64 * bins.width;
                Rectangle::new([(x0, 0.0), (x0 + bins.width, count as f64)], colour.filled())
            }))?;
        }
        Ok(())
    }
}
