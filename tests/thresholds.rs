use fmriprep_autoqc::metrics::{FunctionalMetrics, MotionRecord};
use fmriprep_autoqc::qc::QcThresholds;

fn metrics(mean_fd: Option<f64>, kept: f64, dice: Option<f64>) -> FunctionalMetrics {
    FunctionalMetrics {
        motion: Some(MotionRecord {
            timeseries_length: 100,
            mean_fd_raw: mean_fd,
            mean_fd_scrubbed: mean_fd,
            proportion_kept: kept,
        }),
        functional_dice: dice,
    }
}

#[test]
fn standard_values() {
    let t = QcThresholds::default();
    assert_eq!(t, QcThresholds::STANDARD);
    assert_eq!(t.mean_fd, 0.55);
    assert_eq!(t.scrubbing_fd, 0.2);
    assert_eq!(t.proportion_kept, 0.5);
    assert_eq!(t.anatomical_dice, 0.99);
    assert_eq!(t.functional_dice, 0.89);
}

#[test]
fn mean_fd_boundary_is_strict() {
    let t = QcThresholds::STANDARD;
    assert!(!t.passes_functional(&metrics(Some(0.55), 0.8, Some(0.95))));
    assert!(t.passes_functional(&metrics(Some(0.54999), 0.8, Some(0.95))));
}

#[test]
fn proportion_and_dice_boundaries_are_strict() {
    let t = QcThresholds::STANDARD;
    assert!(!t.passes_functional(&metrics(Some(0.3), 0.5, Some(0.95))));
    assert!(!t.passes_functional(&metrics(Some(0.3), 0.8, Some(0.89))));
    assert!(t.passes_functional(&metrics(Some(0.3), 0.50001, Some(0.89001))));
    assert!(!t.passes_anatomical(0.99));
    assert!(t.passes_anatomical(0.995));
}

#[test]
fn missing_metrics_fail() {
    let t = QcThresholds::STANDARD;
    assert!(!t.passes_functional(&metrics(None, 0.8, Some(0.95))));
    assert!(!t.passes_functional(&metrics(Some(0.3), 0.8, None)));
    let no_motion = FunctionalMetrics {
        motion: None,
        functional_dice: Some(0.99),
    };
    assert!(!t.passes_functional(&no_motion));
}
