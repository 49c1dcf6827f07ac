//! Port abstraction for author subscriptions.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "subscription repository query failed: {message}",
        /// The follower already follows the author.
        Duplicate { message: String } => "subscription already exists: {message}",
        /// The follower or author vanished before the row was stored.
        MissingTarget { message: String } => "subscription target missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Record that `follower` follows `author`.
    async fn add(&self, follower: UserId, author: UserId)
    -> Result<(), SubscriptionRepositoryError>;

    /// Remove a subscription. Returns `false` when none existed.
    async fn remove(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Identifiers of the authors `follower` follows.
    async fn followed_ids(&self, follower: UserId)
    -> Result<Vec<UserId>, SubscriptionRepositoryError>;

    /// Authors `follower` follows, ordered by username.
    async fn followed_authors(
        &self,
        follower: UserId,
    ) -> Result<Vec<User>, SubscriptionRepositoryError>;
}
