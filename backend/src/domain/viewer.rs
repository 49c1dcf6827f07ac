//! Viewer-relative flags for users and recipes.
//!
//! Every predicate answers `false` for anonymous viewers, so a flag is only
//! ever `true` when the viewer is authenticated and the relation exists.

use std::collections::HashSet;

use super::{Recipe, RecipeId, RecipeView, User, UserId, UserProfile};

/// Relations of one viewer loaded ahead of building representations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerContext {
    viewer: Option<UserId>,
    favorites: HashSet<RecipeId>,
    shopping_cart: HashSet<RecipeId>,
    following: HashSet<UserId>,
}

impl ViewerContext {
    /// Context for an unauthenticated request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated viewer with no relations loaded.
    pub fn authenticated(viewer: UserId) -> Self {
        Self {
            viewer: Some(viewer),
            ..Self::default()
        }
    }

    /// Attach the viewer's favourite recipes.
    #[must_use]
    pub fn with_favorites(mut self, favorites: impl IntoIterator<Item = RecipeId>) -> Self {
        self.favorites = favorites.into_iter().collect();
        self
    }

    /// Attach the recipes in the viewer's shopping cart.
    #[must_use]
    pub fn with_shopping_cart(mut self, recipes: impl IntoIterator<Item = RecipeId>) -> Self {
        self.shopping_cart = recipes.into_iter().collect();
        self
    }

    /// Attach the authors the viewer follows.
    #[must_use]
    pub fn with_following(mut self, authors: impl IntoIterator<Item = UserId>) -> Self {
        self.following = authors.into_iter().collect();
        self
    }

    /// Whether the signed-in viewer has favourited `recipe`.
    pub fn is_favorited(&self, recipe: RecipeId) -> bool {
        self.viewer.is_some() && self.favorites.contains(&recipe)
    }

    /// Whether `recipe` sits in the signed-in viewer's cart.
    pub fn is_in_shopping_cart(&self, recipe: RecipeId) -> bool {
        self.viewer.is_some() && self.shopping_cart.contains(&recipe)
    }

    /// Whether the signed-in viewer follows `author`.
    pub fn is_subscribed(&self, author: UserId) -> bool {
        self.viewer.is_some() && self.following.contains(&author)
    }

    /// Decorate a user with the subscription flag.
    pub fn profile(&self, user: User) -> UserProfile {
        let is_subscribed = self.is_subscribed(user.id);
        UserProfile::new(user, is_subscribed)
    }

    /// Decorate a recipe with all viewer flags.
    pub fn recipe_view(&self, recipe: Recipe) -> RecipeView {
        RecipeView {
            author_is_subscribed: self.is_subscribed(recipe.author.id),
            is_favorited: self.is_favorited(recipe.id),
            is_in_shopping_cart: self.is_in_shopping_cart(recipe.id),
            recipe,
        }
    }
}
