//! Port abstraction for tag lookups.
use async_trait::async_trait;

use crate::domain::{Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags ordered by name.
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Fetch a tag by identifier.
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError>;
}
