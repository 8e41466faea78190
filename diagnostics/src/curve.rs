//! Precision-recall curves from per-class scores.

use ndarray::{Array1, Array2};

/// Points of a precision-recall curve, ordered by decreasing threshold
/// (so recall never decreases), starting at recall 0 / precision 1.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionRecallCurve {
    pub recall: Vec<f64>,
    pub precision: Vec<f64>,
    pub average_precision: f64,
    /// What the curve describes, e.g. the positive class or "micro".
    pub label: String,
    /// Name of the probe classifier, for the title.
    pub probe: String,
}

impl PrecisionRecallCurve {
    /// Compute the curve of a binary problem. `None` if there are no
    /// positives, since recall is undefined then.
    pub fn from_binary(scores: &[f64], positives: &[bool], label: &str, probe: &str) -> Option<Self> {
        let total_pos = positives.iter().filter(|&&p| p).count();
        if total_pos == 0 || scores.len() != positives.len() {
            return None;
        }

        let mut paired: Vec<(f64, bool)> = scores.iter().copied().zip(positives.iter().copied()).collect();
        paired.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut recall = vec![0.0];
        let mut precision = vec![1.0];
        let (mut tp, mut fp) = (0usize, 0usize);

        for (i, &(score, is_pos)) in paired.iter().enumerate() {
            if is_pos {
                tp += 1;
            } else {
                fp += 1;
            }
            // only emit a point once all rows sharing this score are counted
            let last_of_threshold = paired.get(i + 1).map_or(true, |next| next.0 != score);
            if last_of_threshold {
                recall.push(tp as f64 / total_pos as f64);
                precision.push(tp as f64 / (tp + fp) as f64);
            }
        }

        let average_precision = recall
            .windows(2)
            .zip(precision.iter().skip(1))
            .map(|(r, &p)| (r[1] - r[0]) * p)
            .sum();

        Some(PrecisionRecallCurve {
            recall,
            precision,
            average_precision,
            label: label.to_string(),
            probe: probe.to_string(),
        })
    }

    /// Binary problems use the second class as positive; with more classes the
    /// one-vs-rest problems are pooled (micro average).
    pub fn from_class_scores(
        scores: &Array2<f64>,
        truth: &Array1<usize>,
        classes: &[String],
        probe: &str,
    ) -> Option<Self> {
        if classes.len() < 2 || scores.ncols() != classes.len() || scores.nrows() != truth.len() {
            return None;
        }

        if classes.len() == 2 {
            let positive: Vec<f64> = scores.column(1).to_vec();
            let labels: Vec<bool> = truth.iter().map(|&c| c == 1).collect();
            return Self::from_binary(&positive, &labels, &classes[1], probe);
        }

        let mut pooled_scores = Vec::with_capacity(scores.len());
        let mut pooled_labels = Vec::with_capacity(scores.len());
        for (row, &class) in scores.outer_iter().zip(truth.iter()) {
            for (j, &s) in row.iter().enumerate() {
                pooled_scores.push(s);
                pooled_labels.push(j == class);
            }
        }
        Self::from_binary(&pooled_scores, &pooled_labels, "micro", probe)
    }

    /// Staircase outline for drawing: precision is held until the next
    /// recall step.
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(self.recall.len() * 2);
        for i in 0..self.recall.len() {
            if i > 0 {
                points.push((self.recall[i - 1], self.precision[i]));
            }
            points.push((self.recall[i], self.precision[i]));
        }
        points
    }
}
