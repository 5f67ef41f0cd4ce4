//! End-to-end reconcile tests covering the forward/rollback contract.

use concord_core::errors::PipelineError;
use concord_core::models::{MappingKey, MappingRecord};
use concord_core::{ReconcileConfig, ReconcileScope};
use concord_pipeline::{Reconciler, StaticSource};
use concord_storage::connection::pragmas::apply_pragmas;
use concord_storage::migrations::run_migrations;
use concord_storage::queries::{catalog_ops, load_history, mapping_ops};
use rusqlite::Connection;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup_db() -> Connection {
    init_tracing();
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn).unwrap();
    run_migrations(&conn).unwrap();
    catalog_ops::insert_standard(&conn, 6, "fedramp-moderate").unwrap();
    catalog_ops::insert_standard(&conn, 8, "fedramp-low").unwrap();
    for id in 1..=80 {
        catalog_ops::insert_control(&conn, id, &format!("AC-{id}"), None).unwrap();
    }
    catalog_ops::insert_control(&conn, 1068, "SC-13 (1)", Some("Cryptographic Protection")).unwrap();
    conn
}

fn record(
    standard_id: i64,
    control_id: i64,
    params: Option<&str>,
    guidance: Option<&str>,
) -> MappingRecord {
    MappingRecord {
        standard_id,
        control_id,
        selection_parameters: params.map(String::from),
        guidance: guidance.map(String::from),
    }
}

fn reconciler(records: Vec<MappingRecord>) -> Reconciler<StaticSource> {
    Reconciler::new(
        StaticSource::new("test", records),
        ReconcileConfig::default(),
    )
}

#[test]
fn first_load_inserts_with_id_one() {
    let conn = setup_db();
    let rec = reconciler(vec![record(
        8,
        1,
        Some("AC-1 (c)(1) [at least annually]"),
        None,
    )]);

    let report = rec.up(&conn).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.total_changed(), 1);

    let rows = mapping_ops::all_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(
        rows[0].selection_parameters.as_deref(),
        Some("AC-1 (c)(1) [at least annually]")
    );
    assert!(rows[0].guidance.is_none());
    assert_eq!(rows[0].created_at, rows[0].updated_at);
}

#[test]
fn reapplying_same_source_is_idempotent() {
    let conn = setup_db();
    let rec = reconciler(vec![
        record(8, 1, Some("AC-1 (c)(1) [at least annually]"), None),
        record(8, 2, None, Some("See AC-2")),
    ]);

    rec.up(&conn).unwrap();
    let first = mapping_ops::all_rows(&conn).unwrap();

    let report = rec.up(&conn).unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.unchanged, 2);

    // No churn at all: ids and stamps are untouched.
    let second = mapping_ops::all_rows(&conn).unwrap();
    assert_eq!(first, second);

    let runs = load_history::query_recent(&conn, 10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.status == "applied"));
}

#[test]
fn changed_guidance_updates_and_bumps_stamp() {
    let conn = setup_db();
    // Pre-state: guidance is null, stamped well in the past.
    mapping_ops::insert_mapping(&conn, &record(8, 1, Some("params"), None), 1_000).unwrap();

    let rec = reconciler(vec![record(8, 1, Some("params"), Some("See SC-13"))]);
    let report = rec.up(&conn).unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.inserted, 0);

    let row = mapping_ops::get_by_key(
        &conn,
        MappingKey {
            standard_id: 8,
            control_id: 1,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(row.guidance.as_deref(), Some("See SC-13"));
    assert_eq!(row.created_at, 1_000, "created_at records the original load");
    assert!(row.updated_at > 1_000, "updated_at must move strictly forward");
}

#[test]
fn in_batch_duplicate_resolves_to_later_record() {
    let conn = setup_db();
    let rec = reconciler(vec![
        record(6, 1068, Some("FIPS-validated"), None),
        record(6, 1068, Some("NSA-approved"), None),
    ]);

    let report = rec.up(&conn).unwrap();
    assert_eq!(report.inserted, 1);

    let row = mapping_ops::get_by_key(
        &conn,
        MappingKey {
            standard_id: 6,
            control_id: 1068,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(row.selection_parameters.as_deref(), Some("NSA-approved"));
}

#[test]
fn strict_duplicates_aborts_the_run() {
    let conn = setup_db();
    let rec = Reconciler::new(
        StaticSource::new(
            "strict",
            vec![
                record(6, 1068, Some("first"), None),
                record(6, 1068, Some("second"), None),
            ],
        ),
        ReconcileConfig {
            strict_duplicates: true,
            ..Default::default()
        },
    );

    let err = rec.up(&conn).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert_eq!(mapping_ops::count(&conn).unwrap(), 0);
}

#[test]
fn empty_batch_for_standard_removes_all_its_rows() {
    let conn = setup_db();
    reconciler(vec![
        record(8, 1, None, None),
        record(8, 2, None, None),
        record(8, 3, None, None),
    ])
    .up(&conn)
    .unwrap();
    assert_eq!(mapping_ops::count(&conn).unwrap(), 3);

    let empty = Reconciler::new(
        StaticSource::new("empty", vec![]).with_empty_standard(8),
        ReconcileConfig::default(),
    );
    let report = empty.up(&conn).unwrap();
    assert_eq!(report.deleted, 3);
    assert_eq!(mapping_ops::count(&conn).unwrap(), 0);
}

#[test]
fn validation_failure_leaves_store_untouched() {
    let conn = setup_db();
    reconciler(vec![record(8, 1, Some("keep"), None)])
        .up(&conn)
        .unwrap();

    // Control 9999 does not exist in the catalog.
    let bad = reconciler(vec![record(8, 1, Some("replace"), None), record(8, 9999, None, None)]);
    let err = bad.up(&conn).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));

    let row = mapping_ops::get_by_key(
        &conn,
        MappingKey {
            standard_id: 8,
            control_id: 1,
        },
    )
    .unwrap()
    .unwrap();
    assert_eq!(row.selection_parameters.as_deref(), Some("keep"));

    let runs = load_history::query_recent(&conn, 1).unwrap();
    assert_eq!(runs[0].status, "aborted");
    assert!(runs[0].error.as_deref().unwrap().contains("violation"));
}

#[test]
fn unaffected_standards_are_left_alone() {
    let conn = setup_db();
    // Standard 6 has persisted rows the batch never mentions.
    mapping_ops::insert_mapping(&conn, &record(6, 10, Some("other"), None), 0).unwrap();

    let report = reconciler(vec![record(8, 1, None, None)]).up(&conn).unwrap();
    assert_eq!(report.deleted, 0);
    assert_eq!(mapping_ops::count(&conn).unwrap(), 2);
}

#[test]
fn protected_standards_survive_all_scope() {
    let conn = setup_db();
    mapping_ops::insert_mapping(&conn, &record(6, 10, Some("legacy"), None), 0).unwrap();

    let rec = Reconciler::new(
        StaticSource::new("all-scope", vec![record(8, 1, None, None)]),
        ReconcileConfig {
            scope: ReconcileScope::AllStandards,
            protected_standards: vec![6],
            ..Default::default()
        },
    );
    let report = rec.up(&conn).unwrap();
    assert_eq!(report.deleted, 0);
    assert_eq!(report.unchanged, 1, "protected row counted, not removed");
    assert!(mapping_ops::get_by_key(
        &conn,
        MappingKey {
            standard_id: 6,
            control_id: 10,
        },
    )
    .unwrap()
    .is_some());
}

#[test]
fn down_then_up_reproduces_logical_rows() {
    let conn = setup_db();
    let rec = reconciler(vec![
        record(8, 1, Some("a"), None),
        record(8, 2, None, Some("b")),
        record(6, 3, None, None),
    ]);
    rec.up(&conn).unwrap();

    let logical_before: Vec<_> = mapping_ops::all_rows(&conn)
        .unwrap()
        .into_iter()
        .map(|r| (r.standard_id, r.control_id, r.selection_parameters, r.guidance))
        .collect();

    rec.down(&conn).unwrap();
    assert_eq!(mapping_ops::count(&conn).unwrap(), 0);

    rec.up(&conn).unwrap();
    let logical_after: Vec<_> = mapping_ops::all_rows(&conn)
        .unwrap()
        .into_iter()
        .map(|r| (r.standard_id, r.control_id, r.selection_parameters, r.guidance))
        .collect();

    assert_eq!(logical_before, logical_after);
}

#[test]
fn down_all_scope_spares_protected_standards() {
    let conn = setup_db();
    mapping_ops::insert_mapping(&conn, &record(6, 10, Some("legacy"), None), 0).unwrap();
    mapping_ops::insert_mapping(&conn, &record(8, 1, None, None), 0).unwrap();

    let rec = Reconciler::new(
        StaticSource::new("all", vec![]),
        ReconcileConfig {
            scope: ReconcileScope::AllStandards,
            protected_standards: vec![6],
            ..Default::default()
        },
    );
    rec.down(&conn).unwrap();

    let rows = mapping_ops::all_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].standard_id, 6);
}

#[test]
fn down_resets_sequence_after_surviving_rows() {
    let conn = setup_db();
    // Rows 1..=50 owned by the pipeline's standard.
    let rec = reconciler((1..=50).map(|c| record(8, c, None, None)).collect());
    rec.up(&conn).unwrap();

    // Rows 51..=60 written by an unrelated process under standard 6.
    for control in 51..=60 {
        mapping_ops::insert_mapping(&conn, &record(6, control, None, None), 0).unwrap();
    }

    rec.down(&conn).unwrap();
    assert_eq!(mapping_ops::count(&conn).unwrap(), 10, "survivors retained");

    let id = mapping_ops::insert_mapping(&conn, &record(8, 61, None, None), 0).unwrap();
    assert_eq!(id, 61, "sequence restarts after the surviving maximum, not at 1");
}

#[test]
fn after_up_no_key_is_duplicated() {
    let conn = setup_db();
    let rec = reconciler(vec![
        record(8, 1, Some("one"), None),
        record(8, 2, None, None),
        record(8, 1, Some("two"), None),
        record(6, 1, None, None),
    ]);
    rec.up(&conn).unwrap();

    let rows = mapping_ops::all_rows(&conn).unwrap();
    let mut keys: Vec<_> = rows.iter().map(|r| r.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), rows.len());
}
