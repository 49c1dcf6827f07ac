//! Port abstraction for per-user recipe marks: favourites and the
//! shopping cart.
//!
//! Both are plain `(user, recipe)` join rows with a uniqueness constraint,
//! so one port serves both, keyed by [`RecipeMark`].
use std::fmt;

use async_trait::async_trait;

use crate::domain::{CartIngredientLine, RecipeId, UserId};

use super::define_port_error;

/// Kind of per-user recipe mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

impl RecipeMark {
    /// Human-readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favourites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl fmt::Display for RecipeMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

define_port_error! {
    /// Persistence errors raised by recipe mark adapters.
    pub enum RecipeMarkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe mark repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe mark repository query failed: {message}",
        /// The `(user, recipe)` pair is already marked.
        Duplicate { message: String } => "recipe already marked: {message}",
        /// The user or recipe vanished before the mark was stored.
        MissingTarget { message: String } => "mark target missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeMarkRepository: Send + Sync {
    /// Insert a mark, failing with `Duplicate` when it already exists.
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), RecipeMarkRepositoryError>;

    /// Delete a mark. Returns `false` when no such mark existed.
    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError>;

    /// Recipes carrying `mark` for `user`.
    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError>;

    /// Every ingredient line of every recipe in the user's cart, ungrouped.
    async fn shopping_cart_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredientLine>, RecipeMarkRepositoryError>;
}
