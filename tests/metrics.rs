mod common;

use fmriprep_autoqc::bids::{BidsLayout, ScanIdentifier};
use fmriprep_autoqc::error::QcError;
use fmriprep_autoqc::metrics::{
    AnalysisLevel, GroupMaskOptions, ReferenceMasks, compute_anatomical_metrics,
    compute_functional_metrics, resolve_references,
};
use fmriprep_autoqc::qc::QcThresholds;
use fmriprep_autoqc::template::TemplateFlowDir;
use tempfile::TempDir;

use common::{
    cube, fd_series, trimmed, write_anat_mask, write_confounds, write_dataset, write_func_mask,
};

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn references(layout: &BidsLayout, home: &TempDir, level: AnalysisLevel) -> ReferenceMasks {
    resolve_references(
        level,
        &labels(&["01", "02"]),
        &labels(&["rest"]),
        layout,
        &TemplateFlowDir::new(home.path()),
        &GroupMaskOptions::default(),
    )
    .unwrap()
}

#[test]
fn functional_metrics_merge_motion_and_overlap() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Participant);

    let table = compute_functional_metrics(
        &labels(&["01", "02"]),
        &labels(&["rest"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap();
    assert_eq!(table.len(), 2);

    let first = &table[&ScanIdentifier::parse("sub-01_task-rest").unwrap()];
    let motion = first.motion.unwrap();
    assert_eq!(motion.timeseries_length, 10);
    assert!((motion.mean_fd_raw.unwrap() - 0.3).abs() < 1e-9);
    assert!((motion.proportion_kept - 0.8).abs() < 1e-12);
    assert_eq!(first.functional_dice, Some(1.0));

    let second = &table[&ScanIdentifier::parse("sub-02_task-rest").unwrap()];
    assert!((second.mean_fd_raw().unwrap() - 0.6).abs() < 1e-9);
}

#[test]
fn scan_with_only_confounds_has_no_dice() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    write_confounds(root.path(), "01", "rest_run-2", &fd_series(0.5));
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Participant);

    let table = compute_functional_metrics(
        &labels(&["01", "02"]),
        &labels(&["rest"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap();
    let extra = &table[&ScanIdentifier::parse("sub-01_task-rest_run-2").unwrap()];
    assert!(extra.motion.is_some());
    assert!(extra.functional_dice.is_none());
}

#[test]
fn group_reference_changes_functional_dice() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    write_func_mask(root.path(), "02", "rest", &trimmed(2));
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Group);
    // two masks, threshold 0.5: a voxel needs both votes
    assert_eq!(refs.func.as_ref(), &trimmed(2));

    let table = compute_functional_metrics(
        &labels(&["01", "02"]),
        &labels(&["rest"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap();
    let second = &table[&ScanIdentifier::parse("sub-02_task-rest").unwrap()];
    assert_eq!(second.functional_dice, Some(1.0));
    let first = &table[&ScanIdentifier::parse("sub-01_task-rest").unwrap()];
    assert!(first.functional_dice.unwrap() < 1.0);
}

#[test]
fn anatomical_metrics_score_each_subject() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    write_anat_mask(root.path(), "02", &trimmed(1));
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Participant);

    let table = compute_anatomical_metrics(
        &labels(&["01", "02"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap();
    assert_eq!(table["01"].anatomical_dice, 1.0);
    assert!(table["01"].pass_qc);
    assert!((table["02"].anatomical_dice - 896.0 / 960.0).abs() < 1e-12);
    assert!(!table["02"].pass_qc);
}

#[test]
fn missing_anatomical_mask_is_an_error() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Participant);

    let err = compute_anatomical_metrics(
        &labels(&["01", "05"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap_err();
    match err.downcast_ref::<QcError>() {
        Some(QcError::MissingAnatomicalMask { subject }) => assert_eq!(subject, "05"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn several_anatomical_masks_are_ambiguous() {
    let root = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_dataset(root.path(), home.path());
    let session = root.path().join("sub-01").join("ses-2");
    std::fs::create_dir_all(&session).unwrap();
    let dir = session.join("anat");
    std::fs::create_dir_all(&dir).unwrap();
    fmriprep_autoqc::volume::nifti_io::write_mask(
        &dir.join("sub-01_ses-2_space-MNI152NLin2009cAsym_desc-brain_mask.nii.gz"),
        &cube(1, 9),
    )
    .unwrap();
    let layout = BidsLayout::open(root.path()).unwrap();
    let refs = references(&layout, &home, AnalysisLevel::Participant);

    let err = compute_anatomical_metrics(
        &labels(&["01"]),
        &layout,
        &refs,
        &QcThresholds::STANDARD,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QcError>(),
        Some(QcError::AmbiguousAnatomicalMask { count: 2, .. })
    ));
}
