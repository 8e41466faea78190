#![allow(dead_code)]

use std::cell::RefCell;

use diagnostics::curve::PrecisionRecallCurve;
use diagnostics::render::{CorrelationMatrix, HistogramOptions};
use diagnostics::{ImageArtifact, ImageFormat, LabeledDataset, PendingBlock, Renderer, Split};
use polars::prelude::*;

/// Renderer that remembers what it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: RefCell<Vec<String>>,
    /// Frames and annotations handed to `missing_matrix`, in call order.
    pub matrices: RefCell<Vec<(DataFrame, Option<Vec<bool>>)>>,
    pub curves: RefCell<Vec<PrecisionRecallCurve>>,
}

impl RecordingRenderer {
    fn record(&self, call: &str) -> ImageArtifact {
        let n = self.calls.borrow().len();
        self.calls.borrow_mut().push(call.to_string());
        ImageArtifact::encode(ImageFormat::Svg, format!("<svg id=\"{call}-{n}\"/>").as_bytes())
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == call).count()
    }
}

impl Renderer for RecordingRenderer {
    fn histogram(&self, _series: &Series, _options: &HistogramOptions) -> ImageArtifact {
        self.record("histogram")
    }

    fn mini_histogram(&self, _series: &Series, _options: &HistogramOptions) -> ImageArtifact {
        self.record("mini_histogram")
    }

    fn correlation_matrix(&self, _matrix: &CorrelationMatrix, _title: &str) -> ImageArtifact {
        self.record("correlation_matrix")
    }

    fn missing_matrix(&self, frame: &DataFrame, wrong: Option<&[bool]>) -> ImageArtifact {
        self.matrices.borrow_mut().push((frame.clone(), wrong.map(<[bool]>::to_vec)));
        self.record("missing_matrix")
    }

    fn missing_bar(&self, _frame: &DataFrame) -> ImageArtifact {
        self.record("missing_bar")
    }

    fn missing_heat(&self, _frame: &DataFrame) -> ImageArtifact {
        self.record("missing_heat")
    }

    fn missing_dendrogram(&self, _frame: &DataFrame) -> ImageArtifact {
        self.record("missing_dendrogram")
    }

    fn precision_recall(&self, curve: &PrecisionRecallCurve) -> ImageArtifact {
        self.curves.borrow_mut().push(curve.clone());
        self.record("precision_recall")
    }
}

pub fn split() -> Split {
    let x_train = df!(
        "f" => [0.1, 0.2, 0.3, 0.9, 1.0, 1.1],
        "g" => [Some(1.0), None, Some(1.2), Some(3.0), Some(3.1), None],
    )
    .unwrap();
    let y_train = Series::new("y".into(), &["A", "A", "A", "B", "B", "B"]);
    let x_test = df!("f" => [0.15, 0.95, 1.05, 0.25], "g" => [1.1, 3.0, 2.9, 1.0]).unwrap();
    let y_test = Series::new("y".into(), &["A", "B", "B", "A"]);
    Split::new(x_train, y_train, x_test, y_test).unwrap()
}

/// Five rows: three right, two wrong in two patterns.
pub fn baseline_block() -> PendingBlock {
    let frame = df!(
        "f" => [Some(1.0), None, Some(3.0), Some(4.0), None],
        "g" => [Some(0.5), Some(0.7), None, Some(0.1), Some(0.2)],
        "actual" => ["A", "A", "B", "B", "A"],
        "predicted" => ["A", "B", "A", "B", "A"],
    )
    .unwrap();
    PendingBlock::new(LabeledDataset::from_trailing_columns(frame).unwrap(), split())
}

/// Every prediction right.
pub fn clean_block() -> PendingBlock {
    let frame = df!(
        "f" => [Some(1.0), Some(2.0), Some(3.0)],
        "actual" => ["A", "B", "A"],
        "predicted" => ["A", "B", "A"],
    )
    .unwrap();
    PendingBlock::new(LabeledDataset::from_trailing_columns(frame).unwrap(), split())
}

pub fn modified_frame() -> DataFrame {
    df!(
        "f" => [Some(1.0), None, Some(3.0), Some(4.0), None],
        "g" => [Some(0.5), Some(0.7), None, Some(0.1), Some(0.2)],
    )
    .unwrap()
}
