//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin: they translate between Diesel rows and domain
//! types and map database failures onto each port's error enum. Row
//! structs (`models.rs`) and table definitions (`schema.rs`) never leave
//! this module.
//!
//! ```ignore
//! use recipebook::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipebook")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_catalogue_import_repository;
mod diesel_ingredient_repository;
mod diesel_recipe_mark_repository;
mod diesel_recipe_repository;
mod diesel_subscription_repository;
mod diesel_tag_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_import_repository::DieselCatalogueImportRepository;
pub use diesel_ingredient_repository::DieselIngredientRepository;
pub use diesel_recipe_mark_repository::DieselRecipeMarkRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
