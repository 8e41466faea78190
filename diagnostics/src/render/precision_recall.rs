use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingBackend;

use super::surface::{DrawResult, Figure};
use crate::curve::PrecisionRecallCurve;
use crate::style::{rgb, RenderStyle};

pub(crate) struct PrecisionRecallFigure<'a> {
    pub curve: &'a PrecisionRecallCurve,
}

impl Figure for PrecisionRecallFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let colour = rgb(style.curve_color);
        let points = self.curve.step_points();

        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Precision-Recall Curve for {}", self.curve.probe),
                style.text(style.title_size),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..1f64, 0f64..1.05f64)?;

        chart
            .configure_mesh()
            .x_desc("Recall")
            .y_desc("Precision")
            .axis_desc_style(style.text(style.label_size))
            .label_style(style.text(style.label_size))
            .draw()?;

        chart.draw_series(AreaSeries::new(points.iter().copied(), 0.0, colour.mix(0.2)))?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), colour.stroke_width(2)))?
            .label(format!(
                "{} (avg precision = {:.2})",
                self.curve.label, self.curve.average_precision
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(style.text(style.label_size))
            .position(SeriesLabelPosition::LowerLeft)
            .draw()?;
        Ok(())
    }
}
