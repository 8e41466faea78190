//! Drives a pending [`Report`] through the matrix builder and the probe
//! classifier.

use tracing::{info, warn};

use crate::classifier::{ClassifierDiagnostics, ProbeKind};
use crate::error::{ReportError, Result};
use crate::matrix::MatrixBuilder;
use crate::overview::build_overview;
use crate::render::{PlottersRenderer, Renderer};
use crate::report::{AssembledBlock, Report, ResultBlock, BASELINE};
use crate::style::{StyleOutcome, StyleStatus};

pub struct ReportAssembler<R: Renderer> {
    renderer: R,
    probe: ProbeKind,
    style_status: StyleStatus,
    overview: bool,
}

impl ReportAssembler<PlottersRenderer> {
    /// Plotters renderer in the configured style.
    pub fn from_style(outcome: StyleOutcome, probe: ProbeKind) -> Self {
        ReportAssembler::new(PlottersRenderer::new(outcome.style), probe).with_style_status(outcome.status)
    }
}

impl<R: Renderer> ReportAssembler<R> {
    pub fn new(renderer: R, probe: ProbeKind) -> Self {
        ReportAssembler {
            renderer,
            probe,
            style_status: StyleStatus::Default,
            overview: false,
        }
    }

    pub fn with_style_status(mut self, status: StyleStatus) -> Self {
        self.style_status = status;
        self
    }

    pub fn with_overview(mut self, enabled: bool) -> Self {
        self.overview = enabled;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn style_status(&self) -> &StyleStatus {
        &self.style_status
    }

    /// Fill in the global missingness matrix and every block's diagnostics.
    ///
    /// Fails before rendering anything if a block was already assembled.
    pub fn assemble(&self, mut report: Report) -> Result<Report> {
        if let Some((name, _)) = report.blocks().find(|(_, block)| !block.has_split()) {
            return Err(ReportError::MissingSplit { block: name.to_string() });
        }

        match &self.style_status {
            StyleStatus::Fallback { reason } => warn!("Rendering with default style: {}", reason),
            StyleStatus::Applied { source } => info!("Rendering with style from {}", source.display()),
            StyleStatus::Default => info!("Rendering with default style"),
        }

        report.missing_matrix = Some(self.renderer.missing_matrix(&report.dataframe.modified, None));

        report.baseline = self.assemble_block(BASELINE, report.baseline)?;
        let strategies = std::mem::take(&mut report.strategy_classifications);
        for (name, block) in strategies {
            let block = self.assemble_block(&name, block)?;
            report.strategy_classifications.insert(name, block);
        }

        if self.overview {
            report.overview = Some(build_overview(&self.renderer, &report.dataframe.modified));
        }
        Ok(report)
    }

    fn assemble_block(&self, name: &str, block: ResultBlock) -> Result<ResultBlock> {
        let ResultBlock::Pending(pending) = block else {
            return Err(ReportError::MissingSplit { block: name.to_string() });
        };
        let (result, split) = pending.into_parts();
        info!("Assembling `{}` ({} rows)", name, result.height());

        let prediction_matrixes = MatrixBuilder::new(&self.renderer).build_all(&result)?;
        info!("`{}`: {} diagnostic matrices", name, prediction_matrixes.len());
        let precision_recall_curve = ClassifierDiagnostics::new(&self.renderer, self.probe).evaluate(split)?;

        Ok(ResultBlock::Assembled(AssembledBlock {
            result,
            prediction_matrixes,
            precision_recall_curve,
        }))
    }
}
