//! The report handed from the profiling stage to the assembler and on to the
//! downstream renderer.

use indexmap::IndexMap;
use polars::prelude::DataFrame;

use crate::artifact::ImageArtifact;
use crate::classifier::Split;
use crate::dataset::LabeledDataset;
use crate::matrix::DiagnosticMatrix;
use crate::overview::DatasetOverview;

pub const BASELINE: &str = "baseline";

/// Working frames of the report.
#[derive(Debug, Clone)]
pub struct ReportFrames {
    /// The dataset after preparation, used for the global missingness matrix.
    pub modified: DataFrame,
}

/// A classification result waiting for its diagnostics.
#[derive(Debug, Clone)]
pub struct PendingBlock {
    pub result: LabeledDataset,
    pub split: Split,
}

impl PendingBlock {
    pub fn new(result: LabeledDataset, split: Split) -> Self {
        PendingBlock { result, split }
    }

    /// Hand out the split; the block cannot be processed twice.
    pub fn into_parts(self) -> (LabeledDataset, Split) {
        (self.result, self.split)
    }
}

/// A classification result with its diagnostics. Has no split.
#[derive(Debug, Clone)]
pub struct AssembledBlock {
    pub result: LabeledDataset,
    pub prediction_matrixes: Vec<DiagnosticMatrix>,
    pub precision_recall_curve: ImageArtifact,
}

#[derive(Debug, Clone)]
pub enum ResultBlock {
    Pending(PendingBlock),
    Assembled(AssembledBlock),
}

impl ResultBlock {
    pub fn result(&self) -> &LabeledDataset {
        match self {
            ResultBlock::Pending(block) => &block.result,
            ResultBlock::Assembled(block) => &block.result,
        }
    }

    pub fn has_split(&self) -> bool {
        matches!(self, ResultBlock::Pending(_))
    }

    pub fn as_assembled(&self) -> Option<&AssembledBlock> {
        match self {
            ResultBlock::Assembled(block) => Some(block),
            ResultBlock::Pending(_) => None,
        }
    }
}

impl From<PendingBlock> for ResultBlock {
    fn from(block: PendingBlock) -> Self {
        ResultBlock::Pending(block)
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub dataframe: ReportFrames,
    pub baseline: ResultBlock,
    /// Strategy name to result, in the order the strategies were given.
    pub strategy_classifications: IndexMap<String, ResultBlock>,
    pub missing_matrix: Option<ImageArtifact>,
    pub overview: Option<DatasetOverview>,
}

impl Report {
    pub fn new(modified: DataFrame, baseline: PendingBlock) -> Self {
        Report {
            dataframe: ReportFrames { modified },
            baseline: baseline.into(),
            strategy_classifications: IndexMap::new(),
            missing_matrix: None,
            overview: None,
        }
    }

    pub fn with_strategy(mut self, name: impl Into<String>, block: PendingBlock) -> Self {
        self.strategy_classifications.insert(name.into(), block.into());
        self
    }

    /// Baseline first, then strategies in order.
    pub fn blocks(&self) -> impl Iterator<Item = (&str, &ResultBlock)> {
        std::iter::once((BASELINE, &self.baseline))
            .chain(self.strategy_classifications.iter().map(|(name, block)| (name.as_str(), block)))
    }

    pub fn is_assembled(&self) -> bool {
        self.missing_matrix.is_some() && self.blocks().all(|(_, block)| !block.has_split())
    }
}
