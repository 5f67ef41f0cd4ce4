//! SQLite persistence for Concord: connection management, versioned
//! schema migrations, query modules, and identity-sequence management
//! for the `standard_control_mapping` table.

pub mod catalog;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use catalog::SqlCatalog;
pub use connection::DatabaseManager;
