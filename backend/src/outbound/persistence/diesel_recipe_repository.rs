//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe row and its ingredient and tag lines are written in a single
//! transaction. Referenced ingredients and tags are checked inside that
//! transaction so a missing row rolls everything back.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Ingredient, Recipe, RecipeFilter, RecipeId, RecipeIngredient, RecipeSummary, Tag, User,
    UserId, ValidatedRecipe,
};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error, violated_constraint,
};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeRow,
    RecipeUpdate, TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart_entries,
    tags, users,
};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures raised while a recipe is read or written.
#[derive(Debug)]
enum StoreError {
    Diesel(diesel::result::Error),
    MissingReference {
        field: &'static str,
        message: String,
    },
    Corrupt(&'static str),
}

/// Request field behind a foreign key constraint, by Postgres' default
/// `<table>_<column>_fkey` naming.
fn reference_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("ingredient_id") => "ingredients",
        Some(name) if name.contains("tag_id") => "tags",
        _ => "author",
    }
}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        if is_foreign_key_violation(&value) {
            let field = reference_field(violated_constraint(&value));
            return Self::MissingReference {
                field,
                message: format!("{field} reference no longer exists"),
            };
        }
        Self::Diesel(value)
    }
}

impl From<StoreError> for RecipeRepositoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Diesel(error) => map_diesel_error(error),
            StoreError::MissingReference { field, message } => {
                Self::missing_reference(field, message)
            }
            StoreError::Corrupt(message) => {
                warn!(message, "stored recipe data failed validation");
                Self::query(message)
            }
        }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn to_column(value: u32, what: &'static str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Corrupt(what))
}

async fn ensure_references(
    conn: &mut AsyncPgConnection,
    recipe: &ValidatedRecipe,
) -> Result<(), StoreError> {
    let wanted: Vec<i32> = recipe
        .composition
        .ingredients
        .iter()
        .map(|line| line.ingredient_id.get())
        .collect();
    let found: HashSet<i32> = ingredients::table
        .filter(ingredients::id.eq_any(&wanted))
        .select(ingredients::id)
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
        return Err(StoreError::MissingReference {
            field: "ingredients",
            message: format!("ingredient {missing} does not exist"),
        });
    }

    if recipe.composition.tags.is_empty() {
        return Ok(());
    }
    let wanted: Vec<i32> = recipe.composition.tags.iter().map(|id| id.get()).collect();
    let found: HashSet<i32> = tags::table
        .filter(tags::id.eq_any(&wanted))
        .select(tags::id)
        .load::<i32>(conn)
        .await?
        .into_iter()
        .collect();
    if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
        return Err(StoreError::MissingReference {
            field: "tags",
            message: format!("tag {missing} does not exist"),
        });
    }
    Ok(())
}

async fn insert_lines(
    conn: &mut AsyncPgConnection,
    recipe_id: i32,
    recipe: &ValidatedRecipe,
) -> Result<(), StoreError> {
    let ingredient_rows = recipe
        .composition
        .ingredients
        .iter()
        .map(|line| {
            Ok(NewRecipeIngredientRow {
                recipe_id,
                ingredient_id: line.ingredient_id.get(),
                amount: to_column(line.amount, "ingredient amount out of range")?,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;
    diesel::insert_into(recipe_ingredients::table)
        .values(&ingredient_rows)
        .execute(conn)
        .await?;

    if !recipe.composition.tags.is_empty() {
        let tag_rows: Vec<NewRecipeTagRow> = recipe
            .composition
            .tags
            .iter()
            .map(|tag_id| NewRecipeTagRow {
                recipe_id,
                tag_id: tag_id.get(),
            })
            .collect();
        diesel::insert_into(recipe_tags::table)
            .values(&tag_rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Attach tags and ingredient lines to recipe headers, preserving order.
async fn assemble(
    conn: &mut AsyncPgConnection,
    headers: Vec<(RecipeRow, UserRow)>,
) -> Result<Vec<Recipe>, StoreError> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = headers.iter().map(|(recipe, _)| recipe.id).collect();

    let tag_rows: Vec<(i32, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .order_by((recipe_tags::recipe_id, tags::name))
        .load(conn)
        .await?;
    let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (recipe_id, row) in tag_rows {
        let tag = Tag::try_from(row).map_err(|_| StoreError::Corrupt("stored tag is invalid"))?;
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }

    let line_rows: Vec<(i32, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .order_by(recipe_ingredients::id)
        .load(conn)
        .await?;
    let mut lines_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, row) in line_rows {
        let amount = u32::try_from(amount)
            .map_err(|_| StoreError::Corrupt("stored ingredient amount is negative"))?;
        lines_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredient {
                ingredient: Ingredient::from(row),
                amount,
            });
    }

    Ok(headers
        .into_iter()
        .map(|(row, author)| Recipe {
            id: RecipeId::new(row.id),
            author: User::from(author),
            cooking_time: row.cooking_time(),
            tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
            ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
            name: row.name,
            image: row.image,
            text: row.text,
            created_at: row.created_at,
        })
        .collect())
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Option<Recipe>, StoreError> {
    let header: Option<(RecipeRow, UserRow)> = recipes::table
        .inner_join(users::table)
        .filter(recipes::id.eq(id))
        .select((RecipeRow::as_select(), UserRow::as_select()))
        .first(conn)
        .await
        .optional()?;
    let Some(header) = header else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![header]).await?.into_iter().next())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: UserId,
        recipe: &ValidatedRecipe,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let created = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    ensure_references(conn, recipe).await?;
                    let row = NewRecipeRow {
                        author_id: author.get(),
                        name: &recipe.name,
                        image: &recipe.image,
                        text: &recipe.text,
                        cooking_time: to_column(recipe.cooking_time, "cooking time out of range")?,
                    };
                    let recipe_id: i32 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    insert_lines(conn, recipe_id, recipe).await?;
                    load_one(conn, recipe_id)
                        .await?
                        .ok_or(StoreError::Corrupt("created recipe vanished"))
                }
                .scope_boxed()
            })
            .await?;
        debug!(recipe_id = %created.id, "recipe stored");
        Ok(created)
    }

    async fn replace(
        &self,
        id: RecipeId,
        recipe: &ValidatedRecipe,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let replaced = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    let exists: Option<i32> = recipes::table
                        .find(id.get())
                        .select(recipes::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if exists.is_none() {
                        return Ok(None);
                    }
                    ensure_references(conn, recipe).await?;
                    let changes = RecipeUpdate {
                        name: &recipe.name,
                        image: &recipe.image,
                        text: &recipe.text,
                        cooking_time: to_column(recipe.cooking_time, "cooking time out of range")?,
                    };
                    diesel::update(recipes::table.find(id.get()))
                        .set(&changes)
                        .execute(conn)
                        .await?;
                    diesel::delete(
                        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id.get())),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id.get())))
                        .execute(conn)
                        .await?;
                    insert_lines(conn, id.get(), recipe).await?;
                    load_one(conn, id.get()).await
                }
                .scope_boxed()
            })
            .await?;
        Ok(replaced)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Lines, favourites and cart entries cascade.
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        Ok(load_one(&mut conn, id.get()).await?)
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .inner_join(users::table)
            .select((RecipeRow::as_select(), UserRow::as_select()))
            .into_boxed();

        if let Some(author) = filter.author {
            query = query.filter(recipes::author_id.eq(author.get()));
        }
        if !filter.tags.is_empty() {
            let slugs: Vec<&str> = filter.tags.iter().map(AsRef::as_ref).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .inner_join(tags::table)
                        .filter(tags::slug.eq_any(slugs))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let Some(user) = filter.favorited_by {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(user.get()))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let Some(user) = filter.in_shopping_cart_of {
            query = query.filter(
                recipes::id.eq_any(
                    shopping_cart_entries::table
                        .filter(shopping_cart_entries::user_id.eq(user.get()))
                        .select(shopping_cart_entries::recipe_id),
                ),
            );
        }

        let headers: Vec<(RecipeRow, UserRow)> = query
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(assemble(&mut conn, headers).await?)
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .select(RecipeRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(RecipeSummary::from).collect())
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count).map_err(|_| RecipeRepositoryError::query("negative recipe count"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("recipe_ingredients_ingredient_id_fkey"), "ingredients")]
    #[case(Some("recipe_tags_tag_id_fkey"), "tags")]
    #[case(Some("recipes_author_id_fkey"), "author")]
    #[case(None, "author")]
    fn foreign_keys_name_the_request_field(
        #[case] constraint: Option<&str>,
        #[case] field: &str,
    ) {
        assert_eq!(reference_field(constraint), field);
    }
}
