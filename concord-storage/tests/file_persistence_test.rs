//! DatabaseManager tests against a real file: persistence across
//! reopen, reader/writer separation, WAL checkpoint.

use concord_core::models::MappingRecord;
use concord_storage::connection::pragmas::verify_wal_mode;
use concord_storage::queries::{catalog_ops, mapping_ops};
use concord_storage::DatabaseManager;

fn record(standard_id: i64, control_id: i64) -> MappingRecord {
    MappingRecord {
        standard_id,
        control_id,
        selection_parameters: None,
        guidance: Some("persisted".to_string()),
    }
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("concord.db");

    {
        let manager = DatabaseManager::open(&db_path).unwrap();
        manager
            .with_writer(|conn| {
                catalog_ops::insert_standard(conn, 8, "fedramp-low")?;
                catalog_ops::insert_control(conn, 1, "AC-1", None)?;
                mapping_ops::insert_mapping(conn, &record(8, 1), 42)?;
                Ok(())
            })
            .unwrap();
        manager.checkpoint().unwrap();
    }

    let manager = DatabaseManager::open(&db_path).unwrap();
    let rows = manager.with_reader(|conn| mapping_ops::all_rows(conn)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].guidance.as_deref(), Some("persisted"));
    assert_eq!(rows[0].created_at, 42);
}

#[test]
fn wal_mode_active_on_file_backed_db() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::open(&dir.path().join("concord.db")).unwrap();
    let wal = manager.with_writer(|conn| verify_wal_mode(conn)).unwrap();
    assert!(wal);
    assert!(manager.path().is_some());
}

#[test]
fn readers_see_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let manager = DatabaseManager::open(&dir.path().join("concord.db")).unwrap();

    manager
        .with_writer(|conn| {
            catalog_ops::insert_standard(conn, 1, "baseline")?;
            catalog_ops::insert_control(conn, 1, "CTL-1", None)?;
            mapping_ops::insert_mapping(conn, &record(1, 1), 0)?;
            Ok(())
        })
        .unwrap();

    let count = manager.with_reader(|conn| mapping_ops::count(conn)).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn in_memory_manager_routes_reads_through_writer() {
    let manager = DatabaseManager::open_in_memory().unwrap();
    manager
        .with_writer(|conn| {
            catalog_ops::insert_standard(conn, 1, "baseline")?;
            catalog_ops::insert_control(conn, 1, "CTL-1", None)?;
            mapping_ops::insert_mapping(conn, &record(1, 1), 0)?;
            Ok(())
        })
        .unwrap();
    let count = manager.with_reader(|conn| mapping_ops::count(conn)).unwrap();
    assert_eq!(count, 1);
    assert!(manager.path().is_none());
}
