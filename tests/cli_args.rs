use clap::Parser;
use fmriprep_autoqc::cli::{AnalysisLevelArg, Cli, Commands};

#[test]
fn run_defaults_to_group_level() {
    let cli = Cli::try_parse_from([
        "fmriprep-autoqc",
        "run",
        "--input",
        "derivatives",
        "--out",
        "qc",
        "--templateflow-home",
        "tf",
    ])
    .unwrap();
    let Commands::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.analysis_level, AnalysisLevelArg::Group);
    assert!(args.participant_label.is_empty());
    assert!(args.task.is_empty());
    assert!(!args.connected_group_mask);
    assert!(!args.save_group_mask);
    assert!(!args.json);
    assert_eq!(args.threads, 0);
}

#[test]
fn run_accepts_several_labels_and_tasks() {
    let cli = Cli::try_parse_from([
        "fmriprep-autoqc",
        "run",
        "--input",
        "derivatives",
        "--out",
        "qc",
        "--analysis-level",
        "participant",
        "--participant-label",
        "01",
        "sub-02",
        "--task",
        "rest",
        "nback",
    ])
    .unwrap();
    let Commands::Run(args) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.analysis_level, AnalysisLevelArg::Participant);
    assert_eq!(args.participant_label, vec!["01", "sub-02"]);
    assert_eq!(args.task, vec!["rest", "nback"]);
}

#[test]
fn run_rejects_unknown_level() {
    let err = Cli::try_parse_from([
        "fmriprep-autoqc",
        "run",
        "--input",
        "d",
        "--out",
        "o",
        "--analysis-level",
        "session",
    ]);
    assert!(err.is_err());
}
