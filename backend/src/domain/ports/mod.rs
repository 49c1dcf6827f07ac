//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`*Query`, `*Command`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_import_repository;
mod catalogue_query;
mod ingredient_repository;
mod recipe_mark_repository;
mod recipe_marks_command;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod shopping_list_query;
mod subscription_repository;
mod subscriptions;
mod tag_repository;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use catalogue_import_repository::MockCatalogueImportRepository;
pub use catalogue_import_repository::{
    CatalogueImport, CatalogueImportError, CatalogueImportRepository, ImportSummary,
};
pub use catalogue_query::{IngredientsQuery, TagsQuery};
#[cfg(test)]
pub use catalogue_query::{MockIngredientsQuery, MockTagsQuery};
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use ingredient_repository::{IngredientRepository, IngredientRepositoryError};
#[cfg(test)]
pub use recipe_mark_repository::MockRecipeMarkRepository;
pub use recipe_mark_repository::{RecipeMark, RecipeMarkRepository, RecipeMarkRepositoryError};
#[cfg(test)]
pub use recipe_marks_command::MockRecipeMarksCommand;
pub use recipe_marks_command::RecipeMarksCommand;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::RecipesCommand;
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::RecipesQuery;
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use subscriptions::{MockSubscriptionsCommand, MockSubscriptionsQuery};
pub use subscriptions::{SubscriptionsCommand, SubscriptionsQuery};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
