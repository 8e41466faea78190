//! Missingness figures: matrix, bar chart and dendrogram.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters_backend::DrawingBackend;

use super::cluster::{average_linkage, leaf_order, Merge};
use super::nullity::NullityMask;
use super::surface::{DrawResult, Figure};
use crate::style::{rgb, RenderStyle};

/// A vertical stretch of present cells drawn in one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Run {
    pub start: usize,
    pub end: usize,
    pub wrong: bool,
}

/// Group consecutive present rows of one column that share an annotation.
pub(crate) fn present_runs(missing: &[bool], wrong: Option<&[bool]>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (r, &is_missing) in missing.iter().enumerate() {
        if is_missing {
            continue;
        }
        let flag = wrong.and_then(|w| w.get(r).copied()).unwrap_or(false);
        match runs.last_mut() {
            Some(run) if run.end == r && run.wrong == flag => run.end = r + 1,
            _ => runs.push(Run {
                start: r,
                end: r + 1,
                wrong: flag,
            }),
        }
    }
    runs
}

fn rotated_labels(style: &RenderStyle) -> TextStyle<'_> {
    style.text(style.label_size).transform(FontTransform::Rotate90)
}

pub(crate) struct MatrixFigure<'a> {
    pub mask: &'a NullityMask,
    /// Per-row "misclassified" flags; `None` draws every present cell alike.
    pub wrong: Option<&'a [bool]>,
}

impl Figure for MatrixFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let cols = self.mask.columns.len();
        if cols == 0 {
            return Err("frame has no columns".into());
        }
        let rows = self.mask.rows.max(1);
        let names = &self.mask.columns;
        let label_at = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => names.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(90)
            .y_label_area_size(40)
            .build_cartesian_2d((0..cols).into_segmented(), 0..rows)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols)
            .x_label_formatter(&label_at)
            .x_label_style(rotated_labels(style))
            .y_labels(2)
            .y_label_formatter(&|y: &usize| (rows - *y).to_string())
            .label_style(style.text(style.label_size))
            .draw()?;

        let present = rgb(style.present_color);
        let error = rgb(style.error_color);
        for (c, column) in self.mask.missing.iter().enumerate() {
            let runs = present_runs(column, self.wrong);
            chart.draw_series(runs.into_iter().map(|run| {
                let colour = if run.wrong { error } else { present };
                // first row at the top
                Rectangle::new(
                    [
                        (SegmentValue::Exact(c), rows - run.end),
                        (SegmentValue::Exact(c + 1), rows - run.start),
                    ],
                    colour.filled(),
                )
            }))?;
        }
        Ok(())
    }
}

pub(crate) struct BarFigure<'a> {
    pub mask: &'a NullityMask,
}

impl Figure for BarFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let cols = self.mask.columns.len();
        if cols == 0 {
            return Err("frame has no columns".into());
        }
        let names = &self.mask.columns;
        let label_at = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => names.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(90)
            .y_label_area_size(40)
            .build_cartesian_2d((0..cols).into_segmented(), 0f64..1f64)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(cols)
            .x_label_formatter(&label_at)
            .x_label_style(rotated_labels(style))
            .y_desc("Fraction present")
            .label_style(style.text(style.label_size))
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(rgb(style.present_color).filled())
                .margin(3)
                .data(self.mask.completeness().into_iter().enumerate()),
        )?;
        Ok(())
    }
}

pub(crate) struct DendrogramFigure<'a> {
    pub mask: &'a NullityMask,
}

impl DendrogramFigure<'_> {
    fn distances(&self) -> Vec<Vec<f64>> {
        let n = self.mask.columns.len();
        (0..n)
            .map(|a| (0..n).map(|b| self.mask.disagreement(a, b)).collect())
            .collect()
    }
}

impl Figure for DendrogramFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let n = self.mask.columns.len();
        if n < 2 {
            return Err(format!("a dendrogram needs two columns, got {n}").into());
        }
        let merges = average_linkage(&self.distances());
        let order = leaf_order(n, &merges);

        // x of every node (leaves then merges), y is the merge distance
        let mut x = vec![0.0; n + merges.len()];
        let mut y = vec![0.0; n + merges.len()];
        for (pos, &leaf) in order.iter().enumerate() {
            x[leaf] = pos as f64 + 0.5;
        }
        for (k, Merge { left, right, distance }) in merges.iter().enumerate() {
            x[n + k] = (x[*left] + x[*right]) / 2.0;
            y[n + k] = *distance;
        }

        let top = merges.iter().map(|m| m.distance).fold(0.0, f64::max).max(1e-3) * 1.1;
        let floor = -top * 0.25;

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..n as f64, floor..top)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Nullity disagreement")
            .label_style(style.text(style.label_size))
            .draw()?;

        let colour = rgb(style.present_color);
        chart.draw_series(merges.iter().map(|m| {
            PathElement::new(
                vec![
                    (x[m.left], y[m.left]),
                    (x[m.left], m.distance),
                    (x[m.right], m.distance),
                    (x[m.right], y[m.right]),
                ],
                colour.stroke_width(2),
            )
        }))?;

        let names = &self.mask.columns;
        chart.draw_series(order.iter().enumerate().map(|(pos, &leaf)| {
            Text::new(
                names[leaf].clone(),
                (pos as f64 + 0.5, floor * 0.3),
                rotated_labels(style),
            )
        }))?;
        Ok(())
    }
}
