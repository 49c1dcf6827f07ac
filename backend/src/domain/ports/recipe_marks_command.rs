//! Driving port for favourites and the shopping cart.

use async_trait::async_trait;

use super::RecipeMark;
use crate::domain::{Error, RecipeId, RecipeSummary, UserId};

/// Use-case port toggling a user's recipe marks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeMarksCommand: Send + Sync {
    /// Add a mark and return the recipe's short representation.
    ///
    /// Fails with `not_found` for an unknown recipe and `conflict` when the
    /// mark already exists.
    async fn mark_recipe(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove a mark; `not_found` when the recipe or the mark is absent.
    async fn unmark_recipe(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error>;
}
