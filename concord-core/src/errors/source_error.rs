//! Source loading errors.

/// Errors that can occur while loading canonical mapping documents.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("malformed record in {document}: {reason}")]
    MalformedRecord { document: String, reason: String },

    #[error("{document} declares format version {found}, expected {expected}")]
    VersionMismatch {
        document: String,
        found: u32,
        expected: u32,
    },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to parse {document}: {message}")]
    Parse { document: String, message: String },
}
