//! Recipe aggregate and its read-side representations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Ingredient, IngredientId, RecipeId, Tag, TagId, TagSlug, User, UserId};

/// Smallest amount accepted on an ingredient line.
pub const MIN_INGREDIENT_AMOUNT: u32 = 1;
/// Largest amount accepted on an ingredient line by default.
pub const MAX_INGREDIENT_AMOUNT: u32 = 50;
/// Shortest cooking time in minutes.
pub const MIN_COOKING_TIME: u32 = 1;
/// Longest cooking time in minutes by default.
pub const MAX_COOKING_TIME: u32 = 420;

/// Configurable bounds applied when validating recipe input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeLimits {
    pub min_amount: u32,
    pub max_amount: u32,
    pub min_cooking_time: u32,
    pub max_cooking_time: u32,
}

impl Default for RecipeLimits {
    fn default() -> Self {
        Self {
            min_amount: MIN_INGREDIENT_AMOUNT,
            max_amount: MAX_INGREDIENT_AMOUNT,
            min_cooking_time: MIN_COOKING_TIME,
            max_cooking_time: MAX_COOKING_TIME,
        }
    }
}

/// Candidate `(ingredient, amount)` pair as submitted by a client.
///
/// The amount is signed so out-of-range input reaches the validator
/// instead of failing deserialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: i64,
}

/// Validated ingredient line ready for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Ingredient line joined with its ingredient for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Unvalidated recipe fields for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

/// Ingredient and tag sets that passed composition validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeComposition {
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<TagId>,
}

/// Recipe fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRecipe {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
    pub composition: RecipeComposition,
}

/// A persisted recipe with its author, tags and ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: User,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
    pub created_at: DateTime<Utc>,
}

/// Short recipe representation returned by toggles and subscription cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// A recipe decorated with flags relative to one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author_is_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Storage-level recipe listing criteria.
///
/// All populated criteria must hold. `tags` matches recipes carrying any
/// of the listed slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub tags: Vec<TagSlug>,
    pub favorited_by: Option<UserId>,
    pub in_shopping_cart_of: Option<UserId>,
}

/// Listing criteria as requested by a viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub author: Option<UserId>,
    pub tags: Vec<TagSlug>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeListQuery {
    /// Resolve viewer-relative flags into storage criteria.
    ///
    /// Anonymous viewers have no favourites or cart, so those flags are
    /// ignored for them rather than producing an empty listing.
    pub fn into_filter(self, viewer: Option<UserId>) -> RecipeFilter {
        RecipeFilter {
            author: self.author,
            tags: self.tags,
            favorited_by: viewer.filter(|_| self.is_favorited),
            in_shopping_cart_of: viewer.filter(|_| self.is_in_shopping_cart),
        }
    }
}
