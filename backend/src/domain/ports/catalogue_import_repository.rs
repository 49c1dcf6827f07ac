//! Port for bulk loading ingredients and tags.
//!
//! Used by the `load-ingredients` binary. Rows that already exist are
//! skipped so the import can be re-run safely.
use async_trait::async_trait;

use crate::domain::{NewIngredient, NewTag};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue import adapters.
    pub enum CatalogueImportError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue import connection failed: {message}",
        /// Query or mutation failed; nothing was committed.
        Query { message: String } => "catalogue import failed: {message}",
    }
}

/// Rows to import in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueImport {
    pub ingredients: Vec<NewIngredient>,
    pub tags: Vec<NewTag>,
}

/// Outcome of a catalogue import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub ingredients_inserted: usize,
    pub ingredients_skipped: usize,
    pub tags_inserted: usize,
    pub tags_skipped: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueImportRepository: Send + Sync {
    /// Insert every new row, skipping existing ones, atomically.
    async fn import(&self, batch: &CatalogueImport) -> Result<ImportSummary, CatalogueImportError>;
}
