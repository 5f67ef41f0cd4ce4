//! V002: load_history — append-only log of reconciliation runs.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS load_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at INTEGER NOT NULL,
    completed_at INTEGER,
    source TEXT NOT NULL,
    format_version INTEGER,
    standards_affected INTEGER,
    records_in INTEGER,
    inserted INTEGER,
    updated INTEGER,
    deleted INTEGER,
    unchanged INTEGER,
    duration_ms INTEGER,
    status TEXT NOT NULL DEFAULT 'running',
    error TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_load_history_time
    ON load_history(started_at DESC);
"#;
