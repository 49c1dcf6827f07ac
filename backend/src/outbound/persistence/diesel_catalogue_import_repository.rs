//! PostgreSQL-backed catalogue import adapter.
//!
//! Ingredients and tags are inserted in one transaction. Existing rows are
//! left untouched through `ON CONFLICT DO NOTHING`, which makes the import
//! idempotent.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::info;

use crate::domain::ports::{CatalogueImport, CatalogueImportError, CatalogueImportRepository, ImportSummary};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewIngredientRow, NewTagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the [`CatalogueImportRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueImportRepository {
    pool: DbPool,
}

impl DieselCatalogueImportRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueImportError {
    map_basic_pool_error(error, CatalogueImportError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueImportError {
    map_basic_diesel_error(
        error,
        CatalogueImportError::query,
        CatalogueImportError::connection,
    )
}

#[async_trait]
impl CatalogueImportRepository for DieselCatalogueImportRepository {
    async fn import(&self, batch: &CatalogueImport) -> Result<ImportSummary, CatalogueImportError> {
        let ingredient_rows: Vec<NewIngredientRow<'_>> = batch
            .ingredients
            .iter()
            .map(|ingredient| NewIngredientRow {
                name: &ingredient.name,
                measurement_unit: &ingredient.measurement_unit,
            })
            .collect();
        let tag_rows: Vec<NewTagRow<'_>> = batch
            .tags
            .iter()
            .map(|tag| NewTagRow {
                name: &tag.name,
                color: tag.color.as_ref(),
                slug: tag.slug.as_ref(),
            })
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (ingredients_inserted, tags_inserted) = conn
            .transaction(|conn| {
                async move {
                    let mut ingredients_inserted = 0;
                    if !ingredient_rows.is_empty() {
                        ingredients_inserted = diesel::insert_into(ingredients::table)
                            .values(&ingredient_rows)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }
                    let mut tags_inserted = 0;
                    if !tag_rows.is_empty() {
                        tags_inserted = diesel::insert_into(tags::table)
                            .values(&tag_rows)
                            .on_conflict_do_nothing()
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>((ingredients_inserted, tags_inserted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let summary = ImportSummary {
            ingredients_inserted,
            ingredients_skipped: batch.ingredients.len().saturating_sub(ingredients_inserted),
            tags_inserted,
            tags_skipped: batch.tags.len().saturating_sub(tags_inserted),
        };
        info!(?summary, "catalogue import committed");
        Ok(summary)
    }
}
