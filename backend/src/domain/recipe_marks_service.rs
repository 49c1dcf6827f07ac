//! Favourite and shopping-cart toggles plus shopping-list aggregation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    RecipeMark, RecipeMarkRepository, RecipeMarkRepositoryError, RecipeMarksCommand,
    RecipeRepository, ShoppingListQuery,
};
use crate::domain::{Error, RecipeId, RecipeSummary, ShoppingList, UserId};

/// Implements [`RecipeMarksCommand`] and [`ShoppingListQuery`].
#[derive(Clone)]
pub struct RecipeMarksService<R, M> {
    recipes: Arc<R>,
    marks: Arc<M>,
}

impl<R, M> RecipeMarksService<R, M> {
    /// Create a new service with the given repositories.
    pub fn new(recipes: Arc<R>, marks: Arc<M>) -> Self {
        Self { recipes, marks }
    }
}

impl<R, M> RecipeMarksService<R, M>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
{
    async fn require_summary(&self, id: RecipeId) -> Result<RecipeSummary, Error> {
        self.recipes
            .find_by_id(id)
            .await?
            .map(|recipe| RecipeSummary::from(&recipe))
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }
}

#[async_trait]
impl<R, M> RecipeMarksCommand for RecipeMarksService<R, M>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
{
    async fn mark_recipe(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let summary = self.require_summary(recipe).await?;
        match self.marks.add(mark, user, recipe).await {
            Ok(()) => {}
            Err(RecipeMarkRepositoryError::Duplicate { .. }) => {
                return Err(Error::conflict(format!(
                    "recipe {recipe} is already in your {mark}"
                )));
            }
            Err(other) => return Err(other.into()),
        }
        info!(user = %user, recipe_id = %recipe, %mark, "recipe marked");
        Ok(summary)
    }

    async fn unmark_recipe(
        &self,
        mark: RecipeMark,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        self.require_summary(recipe).await?;
        if !self.marks.remove(mark, user, recipe).await? {
            return Err(Error::not_found(format!(
                "recipe {recipe} is not in your {mark}"
            )));
        }
        info!(user = %user, recipe_id = %recipe, %mark, "recipe unmarked");
        Ok(())
    }
}

#[async_trait]
impl<R, M> ShoppingListQuery for RecipeMarksService<R, M>
where
    R: RecipeRepository,
    M: RecipeMarkRepository,
{
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error> {
        let lines = self.marks.shopping_cart_lines(user).await?;
        Ok(ShoppingList::aggregate(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockRecipeMarkRepository, MockRecipeRepository};
    use crate::domain::{CartIngredientLine, ErrorCode, Recipe, User};
    use chrono::Utc;
    use rstest::rstest;

    fn stored_recipe(id: RecipeId) -> Recipe {
        Recipe {
            id,
            author: User {
                id: UserId::new(1),
                username: "ada".to_owned(),
                email: "ada@example.com".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
            },
            name: "Omelette".to_owned(),
            image: "omelette.png".to_owned(),
            text: "Whisk and fry.".to_owned(),
            cooking_time: 5,
            tags: Vec::new(),
            ingredients: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn recipes_with(found: bool) -> MockRecipeRepository {
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .returning(move |id| Ok(found.then(|| stored_recipe(id))));
        recipes
    }

    fn service(
        recipes: MockRecipeRepository,
        marks: MockRecipeMarkRepository,
    ) -> RecipeMarksService<MockRecipeRepository, MockRecipeMarkRepository> {
        RecipeMarksService::new(Arc::new(recipes), Arc::new(marks))
    }

    #[rstest]
    #[case(RecipeMark::Favorite)]
    #[case(RecipeMark::ShoppingCart)]
    #[tokio::test]
    async fn marking_returns_short_representation(#[case] mark: RecipeMark) {
        let mut marks = MockRecipeMarkRepository::new();
        marks
            .expect_add()
            .withf(move |m, _, _| *m == mark)
            .return_once(|_, _, _| Ok(()));

        let summary = service(recipes_with(true), marks)
            .mark_recipe(mark, UserId::new(2), RecipeId::new(4))
            .await
            .expect("marked");
        assert_eq!(summary.id, RecipeId::new(4));
        assert_eq!(summary.cooking_time, 5);
    }

    #[rstest]
    #[tokio::test]
    async fn marking_twice_is_conflict() {
        let mut marks = MockRecipeMarkRepository::new();
        marks
            .expect_add()
            .return_once(|_, _, _| Err(RecipeMarkRepositoryError::duplicate("2/4")));

        let error = service(recipes_with(true), marks)
            .mark_recipe(RecipeMark::Favorite, UserId::new(2), RecipeId::new(4))
            .await
            .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn marking_missing_recipe_is_not_found() {
        let mut marks = MockRecipeMarkRepository::new();
        marks.expect_add().never();

        let error = service(recipes_with(false), marks)
            .mark_recipe(RecipeMark::ShoppingCart, UserId::new(2), RecipeId::new(4))
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn unmarking_absent_mark_is_not_found() {
        let mut marks = MockRecipeMarkRepository::new();
        marks.expect_remove().return_once(|_, _, _| Ok(false));

        let error = service(recipes_with(true), marks)
            .unmark_recipe(RecipeMark::Favorite, UserId::new(2), RecipeId::new(4))
            .await
            .expect_err("absent");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn shopping_list_aggregates_cart_lines() {
        let mut marks = MockRecipeMarkRepository::new();
        marks.expect_shopping_cart_lines().return_once(|_| {
            Ok(vec![
                CartIngredientLine::new("flour", "g", 2),
                CartIngredientLine::new("egg", "pc", 1),
                CartIngredientLine::new("flour", "g", 3),
            ])
        });

        let list = service(MockRecipeRepository::new(), marks)
            .shopping_list(UserId::new(2))
            .await
            .expect("list");
        let totals: Vec<_> = list
            .items()
            .iter()
            .map(|item| (item.name.as_str(), item.total_amount))
            .collect();
        assert_eq!(totals, [("egg", 1), ("flour", 5)]);
    }
}
