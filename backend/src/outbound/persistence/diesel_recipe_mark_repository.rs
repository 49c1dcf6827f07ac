//! PostgreSQL-backed `RecipeMarkRepository` implementation using Diesel ORM.
//!
//! Favourites and shopping-cart entries live in separate tables with the
//! same shape; each operation dispatches on [`RecipeMark`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecipeMark, RecipeMarkRepository, RecipeMarkRepositoryError};
use crate::domain::{CartIngredientLine, RecipeId, UserId};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, shopping_cart_entries};

/// Diesel-backed implementation of the [`RecipeMarkRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeMarkRepository {
    pool: DbPool,
}

impl DieselRecipeMarkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeMarkRepositoryError {
    map_basic_pool_error(error, RecipeMarkRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeMarkRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeMarkRepositoryError::query,
        RecipeMarkRepositoryError::connection,
    )
}

fn map_insert_error(
    error: diesel::result::Error,
    mark: RecipeMark,
    recipe: RecipeId,
) -> RecipeMarkRepositoryError {
    if is_unique_violation(&error) {
        RecipeMarkRepositoryError::duplicate(format!("recipe {recipe} already in {mark}"))
    } else if is_foreign_key_violation(&error) {
        RecipeMarkRepositoryError::missing_target(format!(
            "recipe {recipe} or its reader no longer exists"
        ))
    } else {
        map_diesel_error(error)
    }
}

#[async_trait]
impl RecipeMarkRepository for DieselRecipeMarkRepository {
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        match mark {
            RecipeMark::Favorite => {
                diesel::insert_into(favorites::table)
                    .values((
                        favorites::user_id.eq(user.get()),
                        favorites::recipe_id.eq(recipe.get()),
                    ))
                    .execute(&mut conn)
                    .await
            }
            RecipeMark::ShoppingCart => {
                diesel::insert_into(shopping_cart_entries::table)
                    .values((
                        shopping_cart_entries::user_id.eq(user.get()),
                        shopping_cart_entries::recipe_id.eq(recipe.get()),
                    ))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(|error| map_insert_error(error, mark, recipe))?;
        Ok(())
    }

    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = match mark {
            RecipeMark::Favorite => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user.get()))
                        .filter(favorites::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
            RecipeMark::ShoppingCart => {
                diesel::delete(
                    shopping_cart_entries::table
                        .filter(shopping_cart_entries::user_id.eq(user.get()))
                        .filter(shopping_cart_entries::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i32> = match mark {
            RecipeMark::Favorite => {
                favorites::table
                    .filter(favorites::user_id.eq(user.get()))
                    .select(favorites::recipe_id)
                    .load(&mut conn)
                    .await
            }
            RecipeMark::ShoppingCart => {
                shopping_cart_entries::table
                    .filter(shopping_cart_entries::user_id.eq(user.get()))
                    .select(shopping_cart_entries::recipe_id)
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(RecipeId::new).collect())
    }

    async fn shopping_cart_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredientLine>, RecipeMarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, String, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_cart_entries::table
                        .filter(shopping_cart_entries::user_id.eq(user.get()))
                        .select(shopping_cart_entries::recipe_id),
                ),
            )
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(name, unit, amount)| {
                let amount = u32::try_from(amount).map_err(|_| {
                    RecipeMarkRepositoryError::query("stored ingredient amount is negative")
                })?;
                Ok(CartIngredientLine::new(name, unit, amount))
            })
            .collect()
    }
}
