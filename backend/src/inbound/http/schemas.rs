//! Wire representations and their OpenAPI schemas.
//!
//! Entities stay free of `ToSchema`; responses are built from them through
//! `From` conversions so the JSON shape can evolve independently.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Ingredient, IngredientAmount, IngredientId, Recipe, RecipeDraft, RecipeIngredient,
    RecipeSummary, RecipeView, SubscriptionCard, Tag, TagId, UserProfile,
};

/// A user as seen by the requesting viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "chef")]
    pub username: String,
    #[schema(example = "chef@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// `true` when the viewer follows this user.
    pub is_subscribed: bool,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        Self {
            id: user.id.get(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "#E26C2D")]
    pub color: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            color: tag.color.into(),
            slug: tag.slug.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient id.
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// Reference returned by the image store.
    pub image: String,
    pub text: String,
    /// Minutes.
    pub cooking_time: u32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author_is_subscribed,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        let Recipe {
            id,
            author,
            name,
            image,
            text,
            cooking_time,
            tags,
            ingredients,
            created_at: _,
        } = recipe;
        Self {
            id: id.get(),
            tags: tags.into_iter().map(TagResponse::from).collect(),
            author: UserProfile::new(author, author_is_subscribed).into(),
            ingredients: ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name,
            image,
            text,
            cooking_time,
        }
    }
}

/// Short recipe representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<SubscriptionCard> for SubscriptionResponse {
    fn from(card: SubscriptionCard) -> Self {
        Self {
            author: card.author.into(),
            recipes: card
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: card.recipes_count,
        }
    }
}

/// Ingredient line in a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientRequest {
    /// Ingredient id.
    pub id: i32,
    #[schema(minimum = 1, example = 2)]
    pub amount: i64,
}

/// Body of `POST /api/v1/recipes` and `PATCH /api/v1/recipes/{id}`.
///
/// Example JSON:
/// `{"ingredients":[{"id":1,"amount":2}],"tags":[1],"image":"recipes/a.png","name":"Pancakes","text":"Mix.","cooking_time":20}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Vec<RecipeIngredientRequest>,
    #[serde(default)]
    pub tags: Vec<i32>,
    pub image: String,
    pub name: String,
    pub text: String,
    #[schema(minimum = 1, example = 20)]
    pub cooking_time: i64,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(request: RecipeRequest) -> Self {
        Self {
            name: request.name,
            image: request.image,
            text: request.text,
            cooking_time: request.cooking_time,
            ingredients: request
                .ingredients
                .into_iter()
                .map(|line| IngredientAmount {
                    ingredient_id: IngredientId::new(line.id),
                    amount: line.amount,
                })
                .collect(),
            tags: request.tags.into_iter().map(TagId::new).collect(),
        }
    }
}
