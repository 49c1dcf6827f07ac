//! Driving port for reading recipes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeListQuery, RecipeView, UserId};

/// Use-case port for recipe listings and details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// Recipes matching `query`, newest first, flagged for `viewer`.
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
    ) -> Result<Vec<RecipeView>, Error>;

    /// One recipe flagged for `viewer`, or `not_found`.
    async fn get_recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;
}
