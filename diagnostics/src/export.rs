//! JSON view of an assembled report for the downstream renderer.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::artifact::ImageArtifact;
use crate::error::{ReportError, Result};
use crate::matrix::DiagnosticMatrix;
use crate::overview::DatasetOverview;
use crate::report::{Report, ResultBlock, BASELINE};

#[derive(Debug, Serialize)]
pub struct BlockExport<'a> {
    pub rows: usize,
    pub prediction_matrixes: &'a [DiagnosticMatrix],
    pub precision_recall_curve: &'a ImageArtifact,
}

#[derive(Debug, Serialize)]
pub struct ReportExport<'a> {
    pub missing_matrix: &'a ImageArtifact,
    pub overview: Option<&'a DatasetOverview>,
    pub baseline: BlockExport<'a>,
    pub strategy_classifications: IndexMap<&'a str, BlockExport<'a>>,
}

fn block_export<'a>(name: &str, block: &'a ResultBlock) -> Result<BlockExport<'a>> {
    let assembled = block
        .as_assembled()
        .ok_or_else(|| ReportError::NotAssembled { block: name.to_string() })?;
    Ok(BlockExport {
        rows: assembled.result.height(),
        prediction_matrixes: &assembled.prediction_matrixes,
        precision_recall_curve: &assembled.precision_recall_curve,
    })
}

impl<'a> ReportExport<'a> {
    pub fn from_report(report: &'a Report) -> Result<Self> {
        let missing_matrix = report.missing_matrix.as_ref().ok_or_else(|| ReportError::NotAssembled {
            block: "missing_matrix".to_string(),
        })?;
        let mut strategy_classifications = IndexMap::with_capacity(report.strategy_classifications.len());
        for (name, block) in &report.strategy_classifications {
            strategy_classifications.insert(name.as_str(), block_export(name, block)?);
        }
        Ok(ReportExport {
            missing_matrix,
            overview: report.overview.as_ref(),
            baseline: block_export(BASELINE, &report.baseline)?,
            strategy_classifications,
        })
    }
}

pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ReportExport::from_report(report)?)?)
}

pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    let export = ReportExport::from_report(report)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &export)?;
    info!("Report written to {}", path.display());
    Ok(())
}
