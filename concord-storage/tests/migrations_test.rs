//! Migration runner tests: versioning, idempotence, schema invariants.

use concord_storage::connection::pragmas::apply_pragmas;
use concord_storage::migrations::{run_migrations, schema_version};
use concord_storage::queries::catalog_ops;
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    apply_pragmas(&conn).unwrap();
    run_migrations(&conn).unwrap();
    conn
}

#[test]
fn migrations_set_user_version() {
    let conn = setup_db();
    assert_eq!(schema_version(&conn).unwrap(), 2);
}

#[test]
fn migrations_are_idempotent() {
    let conn = setup_db();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 2);
}

#[test]
fn expected_tables_exist() {
    let conn = setup_db();
    for table in ["standards", "controls", "standard_control_mapping", "load_history"] {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(found, 1, "missing table {table}");
    }
}

#[test]
fn mapping_key_is_unique() {
    let conn = setup_db();
    catalog_ops::insert_standard(&conn, 8, "fedramp-low").unwrap();
    catalog_ops::insert_control(&conn, 1, "AC-1", Some("Policy and Procedures")).unwrap();

    conn.execute(
        "INSERT INTO standard_control_mapping
            (standard_id, control_id, created_at, updated_at)
         VALUES (8, 1, 0, 0)",
        [],
    )
    .unwrap();

    let err = conn
        .execute(
            "INSERT INTO standard_control_mapping
                (standard_id, control_id, created_at, updated_at)
             VALUES (8, 1, 1, 1)",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn mapping_rows_require_catalog_parents() {
    let conn = setup_db();
    // No standards or controls seeded: the FK must reject the row.
    let err = conn
        .execute(
            "INSERT INTO standard_control_mapping
                (standard_id, control_id, created_at, updated_at)
             VALUES (8, 1, 0, 0)",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}
