//! Storage-layer errors for SQLite operations.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: i32, reason: String },

    #[error("connection lock poisoned: {context}")]
    LockPoisoned { context: String },
}
