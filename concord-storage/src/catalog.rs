//! SQL-backed catalog snapshot provider.

use concord_core::errors::StorageError;
use concord_core::traits::{CatalogSnapshot, CatalogSource};
use rusqlite::Connection;

use crate::queries::catalog_ops;

/// Reads the parent catalogs (standards, controls) into an immutable
/// id snapshot for the validator.
pub struct SqlCatalog<'a> {
    conn: &'a Connection,
}

impl<'a> SqlCatalog<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CatalogSource for SqlCatalog<'_> {
    fn snapshot(&self) -> Result<CatalogSnapshot, StorageError> {
        Ok(CatalogSnapshot {
            standards: catalog_ops::standard_ids(self.conn)?,
            controls: catalog_ops::control_ids(self.conn)?,
        })
    }
}
