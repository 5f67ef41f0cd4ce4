//! Central constants shared across the workspace.

/// Source document format version this pipeline understands.
pub const SUPPORTED_SOURCE_FORMAT: u32 = 1;

/// Default byte cap for the free-text mapping fields
/// (`selection_parameters`, `guidance`).
pub const DEFAULT_MAX_TEXT_LEN: usize = 8192;

/// Extension of canonical mapping documents.
pub const SOURCE_DOCUMENT_EXT: &str = "json";
