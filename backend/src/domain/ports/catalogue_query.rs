//! Driving ports for the read-only tag and ingredient catalogues.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Use-case port for tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagsQuery: Send + Sync {
    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// One tag, or `not_found`.
    async fn get_tag(&self, id: TagId) -> Result<Tag, Error>;
}

/// Use-case port for ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientsQuery: Send + Sync {
    /// Ingredients ranked for `name`, or all of them by name when absent.
    async fn list_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error>;

    /// One ingredient, or `not_found`.
    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}
