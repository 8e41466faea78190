mod common;

use common::{baseline_block, clean_block, modified_frame, RecordingRenderer};
use diagnostics::export::to_json;
use diagnostics::matrix::ORIGINAL_DATASET;
use diagnostics::{ProbeKind, Report, ReportAssembler, ReportError, StyleStatus};

fn pending_report() -> Report {
    Report::new(modified_frame(), baseline_block()).with_strategy("mean", clean_block())
}

#[test]
fn test_end_to_end_assembly() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::DecisionTree);
    let report = assembler.assemble(pending_report()).unwrap();

    assert!(report.is_assembled());
    let baseline = report.baseline.as_assembled().unwrap();
    let names: Vec<&str> = baseline.prediction_matrixes.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec![ORIGINAL_DATASET, "A→B", "B→A"]);
    assert!(!baseline.precision_recall_curve.is_empty());

    let mean = report.strategy_classifications["mean"].as_assembled().unwrap();
    assert_eq!(mean.prediction_matrixes.len(), 1);
    assert_eq!(mean.prediction_matrixes[0].name, ORIGINAL_DATASET);
    assert!(!mean.precision_recall_curve.is_empty());

    let renderer = assembler.renderer();
    // global + 3 baseline + 1 strategy
    assert_eq!(renderer.count("missing_matrix"), 5);
    assert_eq!(renderer.count("precision_recall"), 2);
    assert_eq!(renderer.count("histogram"), 0);
}

#[test]
fn test_global_matrix_is_unannotated_and_first() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::DecisionTree);
    let report = assembler.assemble(pending_report()).unwrap();

    let matrices = assembler.renderer().matrices.borrow();
    let (frame, wrong) = &matrices[0];
    assert!(wrong.is_none());
    assert!(frame.equals_missing(&modified_frame()));
    assert!(report.missing_matrix.is_some());
}

#[test]
fn test_pair_matrix_sees_matching_rows_first() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::DecisionTree);
    assembler.assemble(pending_report()).unwrap();

    let matrices = assembler.renderer().matrices.borrow();
    let (original, original_wrong) = &matrices[1];
    assert_eq!(original.height(), 5);
    assert_eq!(original_wrong.as_deref(), Some(&[false, true, true, false, false][..]));

    // A→B: row 1 moves to the front, the rest keep their order
    let (reordered, wrong) = &matrices[2];
    let actual: Vec<Option<&str>> = reordered.column("actual").unwrap().as_materialized_series().str().unwrap().into_iter().collect();
    let predicted: Vec<Option<&str>> = reordered.column("predicted").unwrap().as_materialized_series().str().unwrap().into_iter().collect();
    assert_eq!(actual, vec![Some("A"), Some("A"), Some("B"), Some("B"), Some("A")]);
    assert_eq!(predicted, vec![Some("B"), Some("A"), Some("A"), Some("B"), Some("A")]);
    assert_eq!(wrong.as_deref(), Some(&[true, false, true, false, false][..]));
}

#[test]
fn test_reassembly_fails_with_missing_split() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::DecisionTree);
    let report = assembler.assemble(pending_report()).unwrap();
    let calls = assembler.renderer().calls.borrow().len();

    let err = assembler.assemble(report).unwrap_err();
    assert!(matches!(err, ReportError::MissingSplit { ref block } if block == "baseline"));
    assert!(err.is_structural());
    // nothing rendered on the failing call
    assert_eq!(assembler.renderer().calls.borrow().len(), calls);
}

#[test]
fn test_overview_is_optional() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::Logistic).with_overview(true);
    let report = assembler.assemble(pending_report()).unwrap();

    let overview = report.overview.as_ref().unwrap();
    assert_eq!(overview.variables.len(), 2);
    assert!(overview.correlation.is_some());
    let renderer = assembler.renderer();
    assert_eq!(renderer.count("histogram"), 2);
    assert_eq!(renderer.count("missing_bar"), 1);
    assert_eq!(renderer.count("missing_heat"), 1);
    assert_eq!(renderer.count("missing_dendrogram"), 1);
}

#[test]
fn test_style_status_is_kept() {
    let status = StyleStatus::Fallback {
        reason: "unreadable".to_string(),
    };
    let assembler =
        ReportAssembler::new(RecordingRenderer::default(), ProbeKind::default()).with_style_status(status.clone());
    assert_eq!(assembler.style_status(), &status);
    assert!(assembler.assemble(pending_report()).is_ok());
}

#[test]
fn test_export_lists_blocks_in_order() {
    let assembler = ReportAssembler::new(RecordingRenderer::default(), ProbeKind::DecisionTree);
    let pending = pending_report().with_strategy("median", clean_block());
    assert!(matches!(to_json(&pending), Err(ReportError::NotAssembled { .. })));

    let report = assembler.assemble(pending).unwrap();
    let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
    assert_eq!(value["baseline"]["rows"], 5);
    assert_eq!(value["baseline"]["prediction_matrixes"][1]["name"], "A→B");
    let strategies: Vec<&String> = value["strategy_classifications"].as_object().unwrap().keys().collect();
    assert_eq!(strategies, vec!["mean", "median"]);
    assert!(value["missing_matrix"].as_str().unwrap().starts_with("data:image/svg+xml;base64,"));
    assert!(value["overview"].is_null());
}

#[test]
fn test_plotters_renderer_end_to_end() {
    let style = diagnostics::configure_style(None);
    let assembler = ReportAssembler::from_style(style, ProbeKind::DecisionTree);
    let report = assembler.assemble(pending_report()).unwrap();
    let baseline = report.baseline.as_assembled().unwrap();
    assert_eq!(baseline.prediction_matrixes.len(), 3);
    for matrix in &baseline.prediction_matrixes {
        assert!(matrix.image.as_str().starts_with("data:image/"));
    }
    assert_eq!(assembler.style_status(), &StyleStatus::Default);
}
