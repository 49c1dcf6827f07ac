//! Port implementations for [`InMemoryStore`].

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CatalogueImport, CatalogueImportError, CatalogueImportRepository, ImportSummary,
    IngredientRepository, IngredientRepositoryError, RecipeMark, RecipeMarkRepository,
    RecipeMarkRepositoryError, RecipeRepository, RecipeRepositoryError, SubscriptionRepository,
    SubscriptionRepositoryError, TagRepository, TagRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    CartIngredientLine, Ingredient, IngredientId, Recipe, RecipeFilter, RecipeId,
    RecipeSummary, Tag, TagId, User, UserId, ValidatedRecipe, sort_ingredients,
};

use super::{InMemoryStore, State, StoredRecipe};

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.state.read().await;
        let mut tags: Vec<Tag> = state.tags.values().cloned().collect();
        tags.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(tags)
    }

    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        Ok(self.state.read().await.tags.get(&id).cloned())
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let state = self.state.read().await;
        let mut ingredients: Vec<Ingredient> = state.ingredients.values().cloned().collect();
        sort_ingredients(&mut ingredients);
        Ok(ingredients)
    }

    async fn find_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Ingredient>, IngredientRepositoryError> {
        let needle = fragment.to_lowercase();
        let state = self.state.read().await;
        let mut ingredients: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| ingredient.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        sort_ingredients(&mut ingredients);
        Ok(ingredients)
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientRepositoryError> {
        Ok(self.state.read().await.ingredients.get(&id).cloned())
    }
}

fn check_references(
    state: &State,
    author: Option<UserId>,
    recipe: &ValidatedRecipe,
) -> Result<(), RecipeRepositoryError> {
    if let Some(author) = author
        && !state.users.contains_key(&author)
    {
        return Err(RecipeRepositoryError::missing_reference(
            "author",
            format!("user {author} does not exist"),
        ));
    }
    if let Some(line) = recipe
        .composition
        .ingredients
        .iter()
        .find(|line| !state.ingredients.contains_key(&line.ingredient_id))
    {
        return Err(RecipeRepositoryError::missing_reference(
            "ingredients",
            format!("ingredient {} does not exist", line.ingredient_id),
        ));
    }
    if let Some(tag_id) = recipe
        .composition
        .tags
        .iter()
        .find(|tag_id| !state.tags.contains_key(tag_id))
    {
        return Err(RecipeRepositoryError::missing_reference(
            "tags",
            format!("tag {tag_id} does not exist"),
        ));
    }
    Ok(())
}

fn resolved(state: &State, stored: &StoredRecipe) -> Result<Recipe, RecipeRepositoryError> {
    state
        .resolve(stored)
        .ok_or_else(|| RecipeRepositoryError::query(format!("recipe {} lost its author", stored.id)))
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        author: UserId,
        recipe: &ValidatedRecipe,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.state.write().await;
        check_references(&state, Some(author), recipe)?;
        let stored = StoredRecipe {
            id: RecipeId::new(state.allocate_id()),
            author,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            text: recipe.text.clone(),
            cooking_time: recipe.cooking_time,
            ingredients: recipe.composition.ingredients.clone(),
            tags: recipe.composition.tags.clone(),
            created_at: Utc::now(),
        };
        let created = resolved(&state, &stored)?;
        state.recipes.insert(stored.id, stored);
        Ok(created)
    }

    async fn replace(
        &self,
        id: RecipeId,
        recipe: &ValidatedRecipe,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.state.write().await;
        if !state.recipes.contains_key(&id) {
            return Ok(None);
        }
        check_references(&state, None, recipe)?;
        let Some(stored) = state.recipes.get_mut(&id) else {
            return Ok(None);
        };
        stored.name.clone_from(&recipe.name);
        stored.image.clone_from(&recipe.image);
        stored.text.clone_from(&recipe.text);
        stored.cooking_time = recipe.cooking_time;
        stored.ingredients.clone_from(&recipe.composition.ingredients);
        stored.tags.clone_from(&recipe.composition.tags);
        let stored = stored.clone();
        resolved(&state, &stored).map(Some)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.state.write().await;
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.shopping_cart.retain(|(_, recipe)| *recipe != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.state.read().await;
        state
            .recipes
            .get(&id)
            .map(|stored| resolved(&state, stored))
            .transpose()
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.state.read().await;
        state
            .newest_first(|recipe| state.matches(recipe, filter))
            .map(|stored| resolved(&state, stored))
            .collect()
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .newest_first(|recipe| recipe.author == author)
            .take(limit.unwrap_or(usize::MAX))
            .map(StoredRecipe::summary)
            .collect())
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let state = self.state.read().await;
        let count = state
            .recipes
            .values()
            .filter(|recipe| recipe.author == author)
            .count();
        u64::try_from(count).map_err(|_| RecipeRepositoryError::query("recipe count overflow"))
    }
}

#[async_trait]
impl RecipeMarkRepository for InMemoryStore {
    async fn add(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), RecipeMarkRepositoryError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user) {
            return Err(RecipeMarkRepositoryError::missing_target(format!(
                "user {user} does not exist"
            )));
        }
        if !state.recipes.contains_key(&recipe) {
            return Err(RecipeMarkRepositoryError::missing_target(format!(
                "recipe {recipe} does not exist"
            )));
        }
        let marks = match mark {
            RecipeMark::Favorite => &mut state.favorites,
            RecipeMark::ShoppingCart => &mut state.shopping_cart,
        };
        if marks.insert((user, recipe)) {
            Ok(())
        } else {
            Err(RecipeMarkRepositoryError::duplicate(format!(
                "recipe {recipe} already in {mark}"
            )))
        }
    }

    async fn remove(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, RecipeMarkRepositoryError> {
        let mut state = self.state.write().await;
        let marks = match mark {
            RecipeMark::Favorite => &mut state.favorites,
            RecipeMark::ShoppingCart => &mut state.shopping_cart,
        };
        Ok(marks.remove(&(user, recipe)))
    }

    async fn recipe_ids(
        &self,
        mark: RecipeMark,
        user: UserId,
    ) -> Result<Vec<RecipeId>, RecipeMarkRepositoryError> {
        let state = self.state.read().await;
        let marks = match mark {
            RecipeMark::Favorite => &state.favorites,
            RecipeMark::ShoppingCart => &state.shopping_cart,
        };
        Ok(marks
            .iter()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, recipe)| *recipe)
            .collect())
    }

    async fn shopping_cart_lines(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredientLine>, RecipeMarkRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .shopping_cart
            .iter()
            .filter(|(owner, _)| *owner == user)
            .filter_map(|(_, recipe_id)| state.recipes.get(recipe_id))
            .flat_map(|recipe| recipe.ingredients.iter())
            .filter_map(|line| {
                state.ingredients.get(&line.ingredient_id).map(|ingredient| {
                    CartIngredientLine::new(
                        ingredient.name.clone(),
                        ingredient.measurement_unit.clone(),
                        line.amount,
                    )
                })
            })
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn add(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut state = self.state.write().await;
        if follower == author {
            return Err(SubscriptionRepositoryError::query(
                "a user cannot follow themselves",
            ));
        }
        if let Some(missing) = [follower, author]
            .into_iter()
            .find(|id| !state.users.contains_key(id))
        {
            return Err(SubscriptionRepositoryError::missing_target(format!(
                "user {missing} does not exist"
            )));
        }
        if state.subscriptions.insert((follower, author)) {
            Ok(())
        } else {
            Err(SubscriptionRepositoryError::duplicate(format!(
                "user {follower} already follows {author}"
            )))
        }
    }

    async fn remove(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        Ok(self
            .state
            .write()
            .await
            .subscriptions
            .remove(&(follower, author)))
    }

    async fn followed_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .filter(|(who, _)| *who == follower)
            .map(|(_, author)| *author)
            .collect())
    }

    async fn followed_authors(
        &self,
        follower: UserId,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let state = self.state.read().await;
        let mut authors: Vec<User> = state
            .subscriptions
            .iter()
            .filter(|(who, _)| *who == follower)
            .filter_map(|(_, author)| state.users.get(author).cloned())
            .collect();
        authors.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(authors)
    }
}

#[async_trait]
impl CatalogueImportRepository for InMemoryStore {
    async fn import(&self, batch: &CatalogueImport) -> Result<ImportSummary, CatalogueImportError> {
        let mut state = self.state.write().await;
        let mut summary = ImportSummary::default();
        for ingredient in &batch.ingredients {
            if state.insert_ingredient(ingredient).is_some() {
                summary.ingredients_inserted += 1;
            } else {
                summary.ingredients_skipped += 1;
            }
        }
        for tag in &batch.tags {
            if state.insert_tag(tag).is_some() {
                summary.tags_inserted += 1;
            } else {
                summary.tags_skipped += 1;
            }
        }
        Ok(summary)
    }
}
