//! Author subscriptions.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{Error, RecipeSummary, UserId, UserProfile};

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionCard {
    pub author: UserProfile,
    /// Newest first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes by the author, regardless of the limit.
    pub recipes_count: u64,
}

/// Reject a subscription from a user to themselves.
///
/// # Examples
/// ```
/// use recipebook::domain::{ErrorCode, UserId, ensure_not_self_subscription};
///
/// let me = UserId::new(1);
/// let err = ensure_not_self_subscription(me, me).expect_err("self");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert!(ensure_not_self_subscription(me, UserId::new(2)).is_ok());
/// ```
pub fn ensure_not_self_subscription(follower: UserId, author: UserId) -> Result<(), Error> {
    if follower == author {
        return Err(
            Error::invalid_request("users cannot subscribe to themselves")
                .with_details(json!({ "field": "id", "code": "self_subscription" })),
        );
    }
    Ok(())
}
