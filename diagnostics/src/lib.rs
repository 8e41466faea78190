//! Diagnostic report tying missing data to classifier mistakes.
//!
//! A [`Report`] arrives with one result block per preparation strategy, each
//! still holding its train/test split. [`ReportAssembler::assemble`] draws the
//! missingness matrices around every distinct mistake, fits a probe classifier
//! on the split and renders its precision-recall curve.

pub mod artifact;
pub mod assembler;
pub mod classifier;
pub mod curve;
pub mod dataset;
pub mod error;
pub mod error_pairs;
pub mod export;
pub mod loader;
pub mod matrix;
pub mod overview;
pub mod render;
pub mod report;
pub mod style;

pub use artifact::{ImageArtifact, ImageFormat};
pub use assembler::ReportAssembler;
pub use classifier::{ClassifierDiagnostics, ProbeKind, Split};
pub use dataset::LabeledDataset;
pub use error::{ReportError, Result};
pub use error_pairs::ErrorPair;
pub use matrix::{DiagnosticMatrix, MatrixBuilder};
pub use render::{PlottersRenderer, Renderer};
pub use report::{PendingBlock, Report, ResultBlock};
pub use style::{configure_style, RenderStyle, StyleStatus};
