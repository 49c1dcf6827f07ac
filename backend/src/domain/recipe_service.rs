//! Recipe service implementing [`RecipesCommand`] and [`RecipesQuery`].
//!
//! Writes are validated against the configured [`RecipeLimits`] before they
//! reach the repository, and only a recipe's author may change it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    RecipeMark, RecipeMarkRepository, RecipeRepository, RecipesCommand, RecipesQuery,
    SubscriptionRepository,
};
use crate::domain::{
    Error, Recipe, RecipeDraft, RecipeId, RecipeLimits, RecipeListQuery, RecipeView, UserId,
    ViewerContext, validate_recipe,
};

/// Recipe use-cases over the recipe, mark and subscription repositories.
#[derive(Clone)]
pub struct RecipeService<R, M, S> {
    recipes: Arc<R>,
    marks: Arc<M>,
    subscriptions: Arc<S>,
    limits: RecipeLimits,
}

impl<R, M, S> RecipeService<R, M, S> {
    /// Create a new service with the given repositories and limits.
    pub fn new(recipes: Arc<R>, marks: Arc<M>, subscriptions: Arc<S>, limits: RecipeLimits) -> Self {
        Self {
            recipes,
            marks,
            subscriptions,
            limits,
        }
    }
}

impl<R, M, S> RecipeService<R, M, S>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    async fn viewer_context(&self, viewer: Option<UserId>) -> Result<ViewerContext, Error> {
        let Some(viewer) = viewer else {
            return Ok(ViewerContext::anonymous());
        };
        let favorites = self.marks.recipe_ids(RecipeMark::Favorite, viewer).await?;
        let cart = self.marks.recipe_ids(RecipeMark::ShoppingCart, viewer).await?;
        let following = self.subscriptions.followed_ids(viewer).await?;
        Ok(ViewerContext::authenticated(viewer)
            .with_favorites(favorites)
            .with_shopping_cart(cart)
            .with_following(following))
    }

    async fn require_recipe(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }

    async fn require_authored(&self, editor: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self.require_recipe(id).await?;
        if recipe.author.id != editor {
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }
}

#[async_trait]
impl<R, M, S> RecipesCommand for RecipeService<R, M, S>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    async fn create_recipe(
        &self,
        author: UserId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        let validated = validate_recipe(draft, &self.limits)?;
        let recipe = self.recipes.create(author, &validated).await?;
        info!(recipe_id = %recipe.id, author = %author, "recipe created");
        Ok(ViewerContext::authenticated(author).recipe_view(recipe))
    }

    async fn update_recipe(
        &self,
        editor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        self.require_authored(editor, id).await?;
        let validated = validate_recipe(draft, &self.limits)?;
        let Some(recipe) = self.recipes.replace(id, &validated).await? else {
            warn!(recipe_id = %id, "recipe disappeared during update");
            return Err(Error::not_found(format!("recipe {id} not found")));
        };
        info!(recipe_id = %id, "recipe updated");
        let context = self.viewer_context(Some(editor)).await?;
        Ok(context.recipe_view(recipe))
    }

    async fn delete_recipe(&self, editor: UserId, id: RecipeId) -> Result<(), Error> {
        self.require_authored(editor, id).await?;
        if !self.recipes.delete(id).await? {
            warn!(recipe_id = %id, "recipe disappeared before deletion");
            return Err(Error::not_found(format!("recipe {id} not found")));
        }
        info!(recipe_id = %id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, M, S> RecipesQuery for RecipeService<R, M, S>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
    S: SubscriptionRepository,
{
    async fn list_recipes(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
    ) -> Result<Vec<RecipeView>, Error> {
        let filter = query.into_filter(viewer);
        let recipes = self.recipes.list(&filter).await?;
        let context = self.viewer_context(viewer).await?;
        Ok(recipes
            .into_iter()
            .map(|recipe| context.recipe_view(recipe))
            .collect())
    }

    async fn get_recipe(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.require_recipe(id).await?;
        let context = self.viewer_context(viewer).await?;
        Ok(context.recipe_view(recipe))
    }
}
