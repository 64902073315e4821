use fmriprep_autoqc::bids::ScanIdentifier;
use fmriprep_autoqc::error::QcError;
use fmriprep_autoqc::metrics::FunctionalMetrics;
use fmriprep_autoqc::qc::{
    CombinedQcTable, EntityColumns, PARTICIPANT_COLUMN, QcRow, parse_identifiers,
};

fn row(identifier: &str) -> QcRow {
    QcRow {
        identifier: ScanIdentifier::parse(identifier).unwrap(),
        metrics: FunctionalMetrics::default(),
        pass_func_qc: false,
        anatomical_dice: 1.0,
        pass_anat_qc: true,
        pass_all_qc: false,
    }
}

#[test]
fn splits_identifiers_into_columns() {
    let table = CombinedQcTable {
        rows: vec![row("sub-01_ses-1_task-rest"), row("sub-02_ses-1_task-rest")],
    };
    let annotated = parse_identifiers(table).unwrap();
    let entities = &annotated.entities;

    assert_eq!(entities.keys, vec!["sub", "ses", "task"]);
    assert_eq!(entities.headers(), vec![PARTICIPANT_COLUMN, "ses", "task"]);
    assert_eq!(entities.value(1, PARTICIPANT_COLUMN), Some("02"));
    assert_eq!(entities.value(0, "task"), Some("rest"));
    assert_eq!(entities.value(0, "run"), None);
    assert_eq!(annotated.table.len(), 2);
}

#[test]
fn rows_reconstruct_their_identifiers() {
    let ids = ["sub-01_task-rest_run-1", "sub-01_task-rest_run-2", "sub-10_task-nback_run-1"];
    let parsed: Vec<ScanIdentifier> = ids.iter().map(|s| s.parse().unwrap()).collect();
    let columns = EntityColumns::from_identifiers(&parsed).unwrap();
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(columns.reconstruct(i).as_deref(), Some(*id));
    }
}

#[test]
fn differing_entity_keys_are_rejected() {
    let table = CombinedQcTable {
        rows: vec![row("sub-01_task-rest"), row("sub-01_task-rest_run-2")],
    };
    let err = parse_identifiers(table).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<QcError>(),
        Some(QcError::IdentifierMismatch { .. })
    ));
}

#[test]
fn empty_table_has_no_columns() {
    let annotated = parse_identifiers(CombinedQcTable::default()).unwrap();
    assert!(annotated.entities.keys.is_empty());
    assert!(annotated.entities.rows.is_empty());
}
