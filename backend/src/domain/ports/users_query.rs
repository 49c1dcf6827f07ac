//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user profiles
//! decorated for the current viewer without importing persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// All users ordered by username.
    async fn list_users(&self, viewer: Option<UserId>) -> Result<Vec<UserProfile>, Error>;

    /// One user, or `not_found`.
    async fn get_user(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error>;

    /// The authenticated viewer's own profile.
    async fn current_user(&self, viewer: UserId) -> Result<UserProfile, Error>;
}
