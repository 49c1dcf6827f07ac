//! Read-only tag and ingredient catalogue service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{IngredientRepository, IngredientsQuery, TagRepository, TagsQuery};
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId, rank_ingredient_matches, sort_ingredients};

/// Serves tag and ingredient lookups.
#[derive(Clone)]
pub struct CatalogueService<T, I> {
    tags: Arc<T>,
    ingredients: Arc<I>,
}

impl<T, I> CatalogueService<T, I> {
    /// Create a new service with the given repositories.
    pub fn new(tags: Arc<T>, ingredients: Arc<I>) -> Self {
        Self { tags, ingredients }
    }
}

#[async_trait]
impl<T, I> TagsQuery for CatalogueService<T, I>
where
    T: TagRepository,
    I: IngredientRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(self.tags.list_all().await?)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, Error> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }
}

#[async_trait]
impl<T, I> IngredientsQuery for CatalogueService<T, I>
where
    T: TagRepository,
    I: IngredientRepository,
{
    async fn list_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let query = name
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty());
        match query {
            None => {
                let mut all = self.ingredients.list_all().await?;
                sort_ingredients(&mut all);
                Ok(all)
            }
            Some(query) => {
                let candidates = self.ingredients.find_containing(query).await?;
                Ok(rank_ingredient_matches(query, candidates))
            }
        }
    }

    async fn get_ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
