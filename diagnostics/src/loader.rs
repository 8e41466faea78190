//! Run configuration and CSV loading.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use polars::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};

use crate::classifier::{ProbeKind, Split};
use crate::dataset::LabeledDataset;
use crate::error::{ReportError, Result};
use crate::report::{PendingBlock, Report};

/// Files making up one result block.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockPaths {
    /// Classified dataset; the label columns are the last two unless named.
    pub result: PathBuf,
    pub x_train: PathBuf,
    pub y_train: PathBuf,
    pub x_test: PathBuf,
    pub y_test: PathBuf,
    #[serde(default)]
    pub actual: Option<String>,
    #[serde(default)]
    pub predicted: Option<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("report.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub modified: PathBuf,
    pub baseline: BlockPaths,
    #[serde(default)]
    pub strategies: IndexMap<String, BlockPaths>,
    #[serde(default)]
    pub style: Option<PathBuf>,
    #[serde(default)]
    pub probe: ProbeKind,
    #[serde(default)]
    pub overview: bool,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl RunConfig {
    /// Read the config; relative paths in it are taken from its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: RunConfig = serde_json::from_reader(File::open(path)?)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.modified);
        for block in std::iter::once(&mut self.baseline).chain(self.strategies.values_mut()) {
            join(&mut block.result);
            join(&mut block.x_train);
            join(&mut block.y_train);
            join(&mut block.x_test);
            join(&mut block.y_test);
        }
        if let Some(style) = self.style.as_mut() {
            join(style);
        }
        join(&mut self.output);
        self
    }
}

pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub fn read_csv(path: &Path) -> Result<DataFrame> {
    debug!("Reading {}", path.display());
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?)
}

/// First column of a label file.
fn read_labels(path: &Path) -> Result<Series> {
    let frame = read_csv(path)?;
    let column = frame
        .get_columns()
        .first()
        .ok_or_else(|| ReportError::MissingColumn(format!("{}: label column", path.display())))?;
    Ok(column.as_materialized_series().clone())
}

fn load_block(paths: &BlockPaths) -> Result<PendingBlock> {
    let frame = read_csv(&paths.result)?;
    let result = match (&paths.actual, &paths.predicted) {
        (Some(actual), Some(predicted)) => LabeledDataset::new(frame, actual, predicted)?,
        _ => LabeledDataset::from_trailing_columns(frame)?,
    };
    let split = Split::new(
        read_csv(&paths.x_train)?,
        read_labels(&paths.y_train)?,
        read_csv(&paths.x_test)?,
        read_labels(&paths.y_test)?,
    )?;
    Ok(PendingBlock::new(result, split))
}

/// Build the pending report the config describes.
pub fn load_report(config: &RunConfig) -> Result<Report> {
    let mut report = Report::new(read_csv(&config.modified)?, load_block(&config.baseline)?);
    for (name, paths) in &config.strategies {
        report = report.with_strategy(name.clone(), load_block(paths)?);
    }
    info!(
        "Loaded report: {} rows, {} strategies",
        report.dataframe.modified.height(),
        report.strategy_classifications.len()
    );
    Ok(report)
}
