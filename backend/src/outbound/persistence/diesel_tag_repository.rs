//! PostgreSQL-backed `TagRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{Tag, TagId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TagRow;
use super::pool::{DbPool, PoolError};
use super::schema::tags;

/// Diesel-backed implementation of the [`TagRepository`] port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    map_basic_pool_error(error, TagRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TagRepositoryError {
    map_basic_diesel_error(error, TagRepositoryError::query, TagRepositoryError::connection)
}

pub(crate) fn row_to_tag(row: TagRow) -> Result<Tag, TagRepositoryError> {
    let id = row.id;
    Tag::try_from(row).map_err(|message| {
        warn!(tag_id = id, %message, "stored tag failed validation");
        TagRepositoryError::query("stored tag is invalid")
    })
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_tag).collect()
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag).transpose()
    }
}
