//! Probe classifier and its precision-recall diagnostic.
//!
//! The probe is deliberately simple: it only has to show how separable the
//! classes are on a given preparation of the data.

use std::collections::BTreeSet;

use linfa::prelude::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::MultiLogisticRegression;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::Deserialize;
use tracing::{info, warn};

use crate::artifact::ImageArtifact;
use crate::curve::PrecisionRecallCurve;
use crate::error::{ReportError, Result};
use crate::render::Renderer;

/// Train/test partition, consumed by [`ClassifierDiagnostics::evaluate`].
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: DataFrame,
    pub y_train: Series,
    pub x_test: DataFrame,
    pub y_test: Series,
}

impl Split {
    pub fn new(x_train: DataFrame, y_train: Series, x_test: DataFrame, y_test: Series) -> Result<Self> {
        if x_train.height() != y_train.len() {
            return Err(ReportError::ShapeMismatch {
                what: "y_train",
                expected: x_train.height(),
                found: y_train.len(),
            });
        }
        if x_test.height() != y_test.len() {
            return Err(ReportError::ShapeMismatch {
                what: "y_test",
                expected: x_test.height(),
                found: y_test.len(),
            });
        }
        for name in x_train.get_column_names() {
            if x_test.column(name.as_str()).is_err() {
                return Err(ReportError::MissingColumn(format!("x_test.{name}")));
            }
        }
        Ok(Split {
            x_train,
            y_train,
            x_test,
            y_test,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    #[default]
    DecisionTree,
    Logistic,
}

impl ProbeKind {
    pub fn name(self) -> &'static str {
        match self {
            ProbeKind::DecisionTree => "DecisionTreeClassifier",
            ProbeKind::Logistic => "LogisticRegression",
        }
    }

    /// Fit on the training data and return one score column per class.
    fn fit_scores(self, x_train: Array2<f64>, y_train: Array1<usize>, n_classes: usize, x_test: &Array2<f64>) -> Result<Array2<f64>> {
        let train = Dataset::new(x_train, y_train);
        match self {
            ProbeKind::DecisionTree => {
                let model = DecisionTree::params()
                    .max_depth(Some(5))
                    .fit(&train)
                    .map_err(|e| ReportError::Probe(e.to_string()))?;
                let predicted: Array1<usize> = model.predict(x_test);
                let mut scores = Array2::zeros((x_test.nrows(), n_classes));
                for (row, &class) in predicted.iter().enumerate() {
                    scores[[row, class]] = 1.0;
                }
                Ok(scores)
            }
            ProbeKind::Logistic => {
                let model = MultiLogisticRegression::default()
                    .max_iterations(100)
                    .fit(&train)
                    .map_err(|e| ReportError::Probe(e.to_string()))?;
                Ok(model.predict_probabilities(x_test))
            }
        }
    }
}

/// Split converted to arrays, labels mapped to indices into `classes`.
#[derive(Debug)]
struct EncodedSplit {
    classes: Vec<String>,
    x_train: Array2<f64>,
    y_train: Array1<usize>,
    x_test: Array2<f64>,
    y_test: Array1<usize>,
}

fn label_strings(series: &Series) -> Result<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    Ok(cast.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Feature matrix with nulls replaced by the training means.
fn feature_matrix(frame: &DataFrame, columns: &[PlSmallStr], means: &[f64]) -> Result<Array2<f64>> {
    let mut x = Array2::<f64>::zeros((frame.height(), columns.len()));
    for (j, name) in columns.iter().enumerate() {
        let col = frame.column(name.as_str())?.cast(&DataType::Float64)?;
        for (i, v) in col.f64()?.into_iter().enumerate() {
            x[[i, j]] = v.filter(|v| v.is_finite()).unwrap_or(means[j]);
        }
    }
    Ok(x)
}

fn column_means(frame: &DataFrame, columns: &[PlSmallStr]) -> Result<Vec<f64>> {
    columns
        .iter()
        .map(|name| {
            let col = frame.column(name.as_str())?.cast(&DataType::Float64)?;
            let present: Vec<f64> = col.f64()?.into_iter().flatten().filter(|v| v.is_finite()).collect();
            Ok(if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            })
        })
        .collect()
}

fn encode(split: &Split) -> Result<EncodedSplit> {
    let y_train = label_strings(&split.y_train)?;
    let y_test = label_strings(&split.y_test)?;
    let classes: Vec<String> = y_train.iter().flatten().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let class_of = |label: &Option<String>| label.as_ref().and_then(|l| classes.binary_search(l).ok());

    let columns = split.x_train.get_column_names_owned();
    let means = column_means(&split.x_train, &columns)?;

    let train_rows: Vec<usize> = (0..y_train.len()).filter(|&i| y_train[i].is_some()).collect();
    let test_rows: Vec<usize> = (0..y_test.len()).filter(|&i| class_of(&y_test[i]).is_some()).collect();
    if test_rows.len() < y_test.len() {
        warn!(
            "Dropping {} test rows whose label is null or unseen in training",
            y_test.len() - test_rows.len()
        );
    }

    let x_train = feature_matrix(&split.x_train, &columns, &means)?.select(ndarray::Axis(0), &train_rows);
    let x_test = feature_matrix(&split.x_test, &columns, &means)?.select(ndarray::Axis(0), &test_rows);
    let y_train: Array1<usize> = train_rows.iter().filter_map(|&i| class_of(&y_train[i])).collect();
    let y_test: Array1<usize> = test_rows.iter().filter_map(|&i| class_of(&y_test[i])).collect();

    Ok(EncodedSplit {
        classes,
        x_train,
        y_train,
        x_test,
        y_test,
    })
}

pub struct ClassifierDiagnostics<'r, R: Renderer + ?Sized> {
    renderer: &'r R,
    probe: ProbeKind,
}

impl<'r, R: Renderer + ?Sized> ClassifierDiagnostics<'r, R> {
    pub fn new(renderer: &'r R, probe: ProbeKind) -> Self {
        ClassifierDiagnostics { renderer, probe }
    }

    /// Fit the probe on the training half, score the test half and render the
    /// precision-recall curve. The split is consumed.
    ///
    /// A split the probe cannot learn from (fewer than two classes, no test
    /// rows) gives a placeholder artifact.
    pub fn evaluate(&self, split: Split) -> Result<ImageArtifact> {
        let encoded = encode(&split)?;
        drop(split);

        if encoded.classes.len() < 2 || encoded.x_test.nrows() == 0 || encoded.x_train.ncols() == 0 {
            warn!(
                "Probe needs two classes, features and test rows (got {} classes, {} features, {} test rows)",
                encoded.classes.len(),
                encoded.x_train.ncols(),
                encoded.x_test.nrows()
            );
            return Ok(ImageArtifact::placeholder());
        }

        info!(
            "Fitting {} on {} rows, {} classes",
            self.probe.name(),
            encoded.x_train.nrows(),
            encoded.classes.len()
        );
        let n_classes = encoded.classes.len();
        let scores = self.probe.fit_scores(encoded.x_train, encoded.y_train, n_classes, &encoded.x_test)?;

        match PrecisionRecallCurve::from_class_scores(&scores, &encoded.y_test, &encoded.classes, self.probe.name()) {
            Some(curve) => {
                info!("{} average precision {:.3}", curve.label, curve.average_precision);
                Ok(self.renderer.precision_recall(&curve))
            }
            None => {
                warn!("Test partition has no positive rows, precision-recall curve undefined");
                Ok(ImageArtifact::placeholder())
            }
        }
    }
}
