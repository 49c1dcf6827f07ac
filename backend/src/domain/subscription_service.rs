//! Subscription service implementing [`SubscriptionsCommand`] and
//! [`SubscriptionsQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    RecipeRepository, SubscriptionRepository, SubscriptionRepositoryError, SubscriptionsCommand,
    SubscriptionsQuery, UserRepository,
};
use crate::domain::{
    Error, SubscriptionCard, User, UserId, UserProfile, ensure_not_self_subscription,
};

/// Follows and unfollows authors and builds subscription cards.
#[derive(Clone)]
pub struct SubscriptionService<U, S, R> {
    users: Arc<U>,
    subscriptions: Arc<S>,
    recipes: Arc<R>,
}

impl<U, S, R> SubscriptionService<U, S, R> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, recipes: Arc<R>) -> Self {
        Self {
            users,
            subscriptions,
            recipes,
        }
    }
}

impl<U, S, R> SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn require_author(&self, author: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(author)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {author} not found")))
    }

    async fn card(&self, author: User, recipes_limit: Option<usize>) -> Result<SubscriptionCard, Error> {
        let recipes = self
            .recipes
            .summaries_by_author(author.id, recipes_limit)
            .await?;
        let recipes_count = self.recipes.count_by_author(author.id).await?;
        Ok(SubscriptionCard {
            author: UserProfile::new(author, true),
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<U, S, R> SubscriptionsCommand for SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: Option<usize>,
    ) -> Result<SubscriptionCard, Error> {
        let author = self.require_author(author).await?;
        ensure_not_self_subscription(follower, author.id)?;
        match self.subscriptions.add(follower, author.id).await {
            Ok(()) => {}
            Err(SubscriptionRepositoryError::Duplicate { .. }) => {
                return Err(Error::conflict(format!(
                    "already subscribed to {}",
                    author.username
                )));
            }
            Err(other) => return Err(other.into()),
        }
        info!(follower = %follower, author = %author.id, "subscription created");
        self.card(author, recipes_limit).await
    }

    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error> {
        let author = self.require_author(author).await?;
        if !self.subscriptions.remove(follower, author.id).await? {
            return Err(Error::not_found(format!(
                "not subscribed to {}",
                author.username
            )));
        }
        info!(follower = %follower, author = %author.id, "subscription removed");
        Ok(())
    }
}

#[async_trait]
impl<U, S, R> SubscriptionsQuery for SubscriptionService<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    async fn subscriptions(
        &self,
        follower: UserId,
        recipes_limit: Option<usize>,
    ) -> Result<Vec<SubscriptionCard>, Error> {
        let authors = self.subscriptions.followed_authors(follower).await?;
        let mut cards = Vec::with_capacity(authors.len());
        for author in authors {
            cards.push(self.card(author, recipes_limit).await?);
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockRecipeRepository, MockSubscriptionRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, RecipeId, RecipeSummary};
    use mockall::predicate::eq;
    use rstest::rstest;

    type Service =
        SubscriptionService<MockUserRepository, MockSubscriptionRepository, MockRecipeRepository>;

    fn user(id: i32) -> User {
        User {
            id: UserId::new(id),
            username: format!("cook{id}"),
            email: format!("cook{id}@example.com"),
            first_name: "Cook".to_owned(),
            last_name: "Number".to_owned(),
        }
    }

    fn users_returning(found: Option<User>) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(move |_| Ok(found));
        users
    }

    fn service(
        users: MockUserRepository,
        subscriptions: MockSubscriptionRepository,
        recipes: MockRecipeRepository,
    ) -> Service {
        SubscriptionService::new(Arc::new(users), Arc::new(subscriptions), Arc::new(recipes))
    }

    #[rstest]
    #[tokio::test]
    async fn self_subscription_is_rejected() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_add().never();
        let error = service(
            users_returning(Some(user(1))),
            subscriptions,
            MockRecipeRepository::new(),
        )
        .subscribe(UserId::new(1), UserId::new(1), None)
        .await
        .expect_err("self subscription");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d.get("code")),
            Some(&serde_json::json!("self_subscription"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_author_is_not_found() {
        let error = service(
            users_returning(None),
            MockSubscriptionRepository::new(),
            MockRecipeRepository::new(),
        )
        .subscribe(UserId::new(1), UserId::new(5), None)
        .await
        .expect_err("missing author");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_subscription_is_conflict() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_add()
            .return_once(|_, _| Err(SubscriptionRepositoryError::duplicate("1 -> 2")));
        let error = service(
            users_returning(Some(user(2))),
            subscriptions,
            MockRecipeRepository::new(),
        )
        .subscribe(UserId::new(1), UserId::new(2), None)
        .await
        .expect_err("duplicate");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn subscribe_returns_card_with_limited_recipes() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_add()
            .with(eq(UserId::new(1)), eq(UserId::new(2)))
            .return_once(|_, _| Ok(()));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_summaries_by_author()
            .with(eq(UserId::new(2)), eq(Some(1)))
            .return_once(|_, _| {
                Ok(vec![RecipeSummary {
                    id: RecipeId::new(8),
                    name: "Soup".to_owned(),
                    image: "soup.png".to_owned(),
                    cooking_time: 30,
                }])
            });
        recipes.expect_count_by_author().return_once(|_| Ok(3));

        let card = service(users_returning(Some(user(2))), subscriptions, recipes)
            .subscribe(UserId::new(1), UserId::new(2), Some(1))
            .await
            .expect("card");
        assert!(card.author.is_subscribed);
        assert_eq!(card.recipes.len(), 1);
        assert_eq!(card.recipes_count, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn unsubscribe_without_subscription_is_not_found() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_remove().return_once(|_, _| Ok(false));
        let error = service(
            users_returning(Some(user(2))),
            subscriptions,
            MockRecipeRepository::new(),
        )
        .unsubscribe(UserId::new(1), UserId::new(2))
        .await
        .expect_err("not subscribed");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
