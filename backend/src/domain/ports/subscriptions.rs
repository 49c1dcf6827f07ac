//! Driving ports for following authors.

use async_trait::async_trait;

use crate::domain::{Error, SubscriptionCard, UserId};

/// Use-case port for subscribing and unsubscribing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Follow `author` and return the author's card.
    ///
    /// Fails with `not_found` for an unknown author, `invalid_request` when
    /// following oneself and `conflict` when already following.
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        recipes_limit: Option<usize>,
    ) -> Result<SubscriptionCard, Error>;

    /// Stop following `author`; `not_found` when not following.
    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error>;
}

/// Use-case port for listing followed authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Cards for every followed author ordered by username.
    async fn subscriptions(
        &self,
        follower: UserId,
        recipes_limit: Option<usize>,
    ) -> Result<Vec<SubscriptionCard>, Error>;
}
