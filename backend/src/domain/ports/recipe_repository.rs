//! Port abstraction for recipe persistence.
//!
//! A recipe and its ingredient and tag lines are written together: adapters
//! must apply [`RecipeRepository::create`] and [`RecipeRepository::replace`]
//! inside one transaction, committing only when every line is stored.
use async_trait::async_trait;

use crate::domain::{Recipe, RecipeFilter, RecipeId, RecipeSummary, UserId, ValidatedRecipe};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// A referenced row does not exist; `field` names the request field
        /// (`ingredients`, `tags` or `author`) that carried it.
        MissingReference { field: String, message: String } => "recipe references unknown rows: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Store a new recipe with its lines and return it as persisted.
    async fn create(
        &self,
        author: UserId,
        recipe: &ValidatedRecipe,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite a recipe's fields and replace all of its lines.
    ///
    /// Returns `None` when the recipe does not exist.
    async fn replace(
        &self,
        id: RecipeId,
        recipe: &ValidatedRecipe,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete a recipe together with its lines, favourites and cart entries.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Fetch a recipe with its author, tags and ingredient lines.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Recipes matching `filter`, newest first.
    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Short representations of an author's recipes, newest first.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError>;

    /// Number of recipes published by `author`.
    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError>;
}
