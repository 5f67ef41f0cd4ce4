//! V001: Initial schema — parent catalogs and the mapping table.
//! standards, controls, standard_control_mapping.

pub const MIGRATION_SQL: &str = r#"
-- Parent catalogs. Read-only collaborators of the pipeline; rows are
-- seeded by deployment bootstrap or tests, never by a reconcile run.
CREATE TABLE IF NOT EXISTS standards (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
) STRICT;

CREATE TABLE IF NOT EXISTS controls (
    id INTEGER PRIMARY KEY,
    identifier TEXT NOT NULL UNIQUE,
    title TEXT
) STRICT;

-- The reconciled table. AUTOINCREMENT keeps the id space monotonic:
-- the sqlite_sequence row for this table is the identity sequence, and
-- ids are never reused while it only moves forward.
CREATE TABLE IF NOT EXISTS standard_control_mapping (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    standard_id INTEGER NOT NULL REFERENCES standards(id),
    control_id INTEGER NOT NULL REFERENCES controls(id),
    selection_parameters TEXT,
    guidance TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE (standard_id, control_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_mapping_standard
    ON standard_control_mapping(standard_id);
CREATE INDEX IF NOT EXISTS idx_mapping_control
    ON standard_control_mapping(control_id);
"#;
