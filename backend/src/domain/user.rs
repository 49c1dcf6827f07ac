//! Registered users as seen by the recipe domain.
//!
//! Accounts are created by the authentication service; this crate only
//! reads them and relates them to recipes and subscriptions.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Application user.
///
/// ## Invariants
/// - `username` and `email` are unique across users (enforced by storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user as presented to a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    /// `true` only when the viewer is authenticated and follows this user.
    pub is_subscribed: bool,
}

impl UserProfile {
    /// Pair a user with the viewer-specific subscription flag.
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            user,
            is_subscribed,
        }
    }
}
