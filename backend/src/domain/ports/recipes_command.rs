//! Driving port for writing recipes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, UserId};

/// Use-case port for creating, updating and deleting recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Validate and publish a recipe authored by `author`.
    async fn create_recipe(&self, author: UserId, draft: RecipeDraft)
    -> Result<RecipeView, Error>;

    /// Replace a recipe. Only its author may do so.
    async fn update_recipe(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe. Only its author may do so.
    async fn delete_recipe(&self, editor: UserId, id: RecipeId) -> Result<(), Error>;
}
