use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::DrawingBackend;

use super::surface::{DrawResult, Figure};
use crate::style::RenderStyle;

/// A square, labelled matrix of coefficients in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major; `NaN` where a coefficient is undefined.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Pairwise-complete Pearson correlation between the given columns.
    pub fn pearson(labels: Vec<String>, columns: &[Vec<Option<f64>>]) -> Self {
        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson_pair(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        CorrelationMatrix { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn pearson_pair(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

const NEGATIVE: (f64, f64, f64) = (209.0, 60.0, 75.0);
const POSITIVE: (f64, f64, f64) = (66.0, 136.0, 181.0);

/// Red through white to blue over `[-1, 1]`; undefined values are light grey.
pub fn diverging_colour(v: f64) -> RGBColor {
    if !v.is_finite() {
        return RGBColor(230, 230, 230);
    }
    let v = v.clamp(-1.0, 1.0);
    let (end, t) = if v < 0.0 { (NEGATIVE, -v) } else { (POSITIVE, v) };
    let mix = |c: f64| (255.0 + (c - 255.0) * t).round() as u8;
    RGBColor(mix(end.0), mix(end.1), mix(end.2))
}

pub(crate) struct CorrelationFigure<'a> {
    pub matrix: &'a CorrelationMatrix,
    pub title: &'a str,
}

impl Figure for CorrelationFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let n = self.matrix.len();
        let labels = &self.matrix.labels;
        let label_at = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, style.text(style.title_size))
            .margin(10)
            .x_label_area_size(80)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&label_at)
            .y_label_formatter(&label_at)
            .label_style(style.text(style.label_size))
            .draw()?;

        // row 0 at the top, as a matrix is read
        chart.draw_series(self.matrix.values.iter().enumerate().flat_map(|(i, row)| {
            let y = n - 1 - i;
            row.iter().enumerate().map(move |(j, &v)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(j), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(j + 1), SegmentValue::Exact(y + 1)),
                    ],
                    diverging_colour(v).filled(),
                )
            })
        }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let a = vec![Some(1.0), Some(2.0), Some(3.0)];
        let b = vec![Some(2.0), Some(4.0), Some(6.0)];
        let c = vec![Some(3.0), Some(2.0), Some(1.0)];
        let m = CorrelationMatrix::pearson(vec!["a".into(), "b".into(), "c".into()], &[a, b, c]);
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
        assert!((m.values[0][2] + 1.0).abs() < 1e-12);
        assert_eq!(m.values[1][2], m.values[2][1]);
    }

    #[test]
    fn test_pearson_skips_nulls_and_constants() {
        let a = vec![Some(1.0), None, Some(3.0), Some(5.0)];
        let b = vec![Some(1.0), Some(9.0), Some(3.0), Some(5.0)];
        let flat = vec![Some(4.0), Some(4.0), Some(4.0), Some(4.0)];
        let m = CorrelationMatrix::pearson(vec!["a".into(), "b".into(), "f".into()], &[a, b, flat]);
        assert!((m.values[0][1] - 1.0).abs() < 1e-12);
        assert!(m.values[0][2].is_nan());
    }

    #[test]
    fn test_diverging_colour_ends() {
        assert_eq!(diverging_colour(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging_colour(1.0), RGBColor(66, 136, 181));
        assert_eq!(diverging_colour(-1.0), RGBColor(209, 60, 75));
        assert_eq!(diverging_colour(f64::NAN), RGBColor(230, 230, 230));
    }
}
