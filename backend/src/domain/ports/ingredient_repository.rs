//! Port abstraction for ingredient lookups.
//!
//! Adapters narrow candidates by name fragment; ordering is applied by
//! [`crate::domain::rank_ingredient_matches`] so every adapter ranks alike.
use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ingredient repository adapters.
    pub enum IngredientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ingredient repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "ingredient repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// All ingredients ordered by name, then unit.
    async fn list_all(&self) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Ingredients whose name contains `fragment`, ignoring case.
    ///
    /// The fragment is matched literally; wildcard characters carry no
    /// special meaning. Results may be unordered.
    async fn find_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError>;

    /// Fetch an ingredient by identifier.
    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError>;
}
