//! Domain primitives, aggregates and services.
//!
//! Purpose: define the recipe-sharing model independently of transport and
//! storage. Entities document their invariants; validation and aggregation
//! are plain functions; services implement the driving ports in
//! [`ports`] on top of the driven repository ports.
//!
//! Public surface:
//! - Entities: [`User`], [`Tag`], [`Ingredient`], [`Recipe`] and their ids.
//! - Validation: [`validate_composition`], [`validate_recipe`].
//! - Aggregation: [`ShoppingList`].
//! - Search ranking: [`rank_ingredient_matches`].
//! - Errors: [`Error`], [`ErrorCode`], [`CompositionError`].

pub mod catalogue_service;
pub mod error;
pub mod ids;
pub mod ingredient;
pub mod ports;
pub mod recipe;
pub mod recipe_composition;
pub mod recipe_marks_service;
pub mod recipe_service;
mod service_errors;
pub mod shopping_list;
pub mod subscription;
pub mod subscription_service;
pub mod tag;
pub mod trace_id;
pub mod user;
pub mod users_service;
pub mod viewer;

pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode};
pub use self::ids::{IngredientId, InvalidIdError, RecipeId, TagId, UserId};
pub use self::ingredient::{
    Ingredient, IngredientValidationError, NewIngredient, rank_ingredient_matches,
    sort_ingredients,
};
pub use self::recipe::{
    IngredientAmount, IngredientLine, MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME,
    MIN_INGREDIENT_AMOUNT, Recipe, RecipeComposition, RecipeDraft, RecipeFilter,
    RecipeIngredient, RecipeLimits, RecipeListQuery, RecipeSummary, RecipeView, ValidatedRecipe,
};
pub use self::recipe_composition::{CompositionError, validate_composition, validate_recipe};
pub use self::recipe_marks_service::RecipeMarksService;
pub use self::recipe_service::RecipeService;
pub use self::shopping_list::{
    CartIngredientLine, ReportFormat, SHOPPING_LIST_HEADER, ShoppingList, ShoppingListItem,
    UnsupportedReportFormat,
};
pub use self::subscription::{SubscriptionCard, ensure_not_self_subscription};
pub use self::subscription_service::SubscriptionService;
pub use self::tag::{HexColor, NewTag, Tag, TagSlug, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserProfile};
pub use self::users_service::UsersService;
pub use self::viewer::ViewerContext;
