mod common;

use std::path::PathBuf;

use fmriprep_autoqc::ctx::Ctx;
use fmriprep_autoqc::io::json_writer::build_report;
use fmriprep_autoqc::metrics::AnalysisLevel;
use fmriprep_autoqc::pipeline::Pipeline;
use fmriprep_autoqc::pipeline::stage1_dataset::Stage1Dataset;
use fmriprep_autoqc::pipeline::stage2_references::Stage2References;
use fmriprep_autoqc::pipeline::stage3_functional::Stage3Functional;
use fmriprep_autoqc::pipeline::stage4_anatomical::Stage4Anatomical;
use fmriprep_autoqc::pipeline::stage5_assess::Stage5Assess;
use serde_json::Value;
use tempfile::TempDir;

use common::write_dataset;

fn assessed_ctx(input: &TempDir, home: &TempDir, subjects: &[&str]) -> Ctx {
    let mut ctx = Ctx::new(
        input.path().to_path_buf(),
        PathBuf::from("unused"),
        AnalysisLevel::Group,
        subjects.iter().map(|s| s.to_string()).collect(),
        Vec::new(),
        home.path().to_path_buf(),
    );
    Pipeline::new(vec![
        Box::new(Stage1Dataset::new()),
        Box::new(Stage2References::new()),
        Box::new(Stage3Functional::new()),
        Box::new(Stage4Anatomical::new()),
        Box::new(Stage5Assess::new()),
    ])
    .run(&mut ctx)
    .unwrap();
    ctx
}

#[test]
fn json_report_populated() {
    let input = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(input.path(), home.path());
    let ctx = assessed_ctx(&input, &home, &[]);

    let report = build_report(&ctx).unwrap();
    assert_eq!(report.scans.len(), 2);
    assert_eq!(report.counts.passed_all, 1);
    assert_eq!(report.input_meta.tasks, vec!["rest"]);

    let v: Value = serde_json::to_value(&report).unwrap();
    let scan = &v["scans"][0];
    assert_eq!(scan["identifier"], "sub-01_task-rest");
    assert_eq!(scan["entities"]["task"], "rest");
    assert_eq!(scan["timeseries_length"], 10);
    assert_eq!(scan["functional_dice"], 1.0);
    assert_eq!(scan["pass_all_qc"], true);
}

#[test]
fn participant_labels_accept_prefix() {
    let input = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(input.path(), home.path());
    let ctx = assessed_ctx(&input, &home, &["01", "sub-02"]);
    assert_eq!(ctx.subjects, vec!["01", "02"]);
    assert!(ctx.warnings.is_empty());

    let report = build_report(&ctx).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.references.uncovered_subjects.len(), 0);
}
