//! User directory service implementing [`UsersQuery`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{SubscriptionRepository, UserRepository, UsersQuery};
use crate::domain::{Error, UserId, UserProfile, ViewerContext};

/// Reads users and decorates them with the viewer's subscription flag.
#[derive(Clone)]
pub struct UsersService<U, S> {
    users: Arc<U>,
    subscriptions: Arc<S>,
}

impl<U, S> UsersService<U, S> {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<U>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }
}

impl<U, S> UsersService<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn viewer_context(&self, viewer: Option<UserId>) -> Result<ViewerContext, Error> {
        let Some(viewer) = viewer else {
            return Ok(ViewerContext::anonymous());
        };
        let following = self.subscriptions.followed_ids(viewer).await?;
        Ok(ViewerContext::authenticated(viewer).with_following(following))
    }
}

#[async_trait]
impl<U, S> UsersQuery for UsersService<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    async fn list_users(&self, viewer: Option<UserId>) -> Result<Vec<UserProfile>, Error> {
        let context = self.viewer_context(viewer).await?;
        let users = self.users.list_all().await?;
        Ok(users.into_iter().map(|user| context.profile(user)).collect())
    }

    async fn get_user(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        let context = self.viewer_context(viewer).await?;
        Ok(context.profile(user))
    }

    async fn current_user(&self, viewer: UserId) -> Result<UserProfile, Error> {
        match self.users.find_by_id(viewer).await? {
            Some(user) => Ok(UserProfile::new(user, false)),
            None => {
                tracing::warn!(user_id = %viewer, "session refers to a missing user");
                Err(Error::unauthorized("session user no longer exists"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::User;
    use crate::domain::ports::{
        MockSubscriptionRepository, MockUserRepository, UserPersistenceError,
    };
    use mockall::predicate::eq;
    use rstest::rstest;

    fn user(id: i32, username: &str) -> User {
        User {
            id: UserId::new(id),
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            first_name: "First".to_owned(),
            last_name: "Last".to_owned(),
        }
    }

    fn service(
        users: MockUserRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> UsersService<MockUserRepository, MockSubscriptionRepository> {
        UsersService::new(Arc::new(users), Arc::new(subscriptions))
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_listing_never_reports_subscriptions() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_all()
            .times(1)
            .return_once(|| Ok(vec![user(1, "ada"), user(2, "bob")]));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_followed_ids().never();

        let profiles = service(users, subscriptions)
            .list_users(None)
            .await
            .expect("profiles");
        assert!(profiles.iter().all(|profile| !profile.is_subscribed));
    }

    #[rstest]
    #[tokio::test]
    async fn listing_flags_followed_authors() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_all()
            .return_once(|| Ok(vec![user(1, "ada"), user(2, "bob")]));
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_followed_ids()
            .with(eq(UserId::new(1)))
            .return_once(|_| Ok(vec![UserId::new(2)]));

        let profiles = service(users, subscriptions)
            .list_users(Some(UserId::new(1)))
            .await
            .expect("profiles");
        let flags: Vec<_> = profiles.iter().map(|p| p.is_subscribed).collect();
        assert_eq!(flags, [false, true]);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let error = service(users, MockSubscriptionRepository::new())
            .get_user(None, UserId::new(7))
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_are_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_list_all()
            .return_once(|| Err(UserPersistenceError::connection("down")));
        let error = service(users, MockSubscriptionRepository::new())
            .list_users(None)
            .await
            .expect_err("failure");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
