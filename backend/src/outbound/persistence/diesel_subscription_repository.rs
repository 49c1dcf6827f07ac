//! PostgreSQL-backed `SubscriptionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the [`SubscriptionRepository`] port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    map_basic_pool_error(error, SubscriptionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    map_basic_diesel_error(
        error,
        SubscriptionRepositoryError::query,
        SubscriptionRepositoryError::connection,
    )
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn add(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::follower_id.eq(follower.get()),
                subscriptions::author_id.eq(author.get()),
            ))
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if is_unique_violation(&error) {
                    SubscriptionRepositoryError::duplicate(format!(
                        "user {follower} already follows {author}"
                    ))
                } else if is_foreign_key_violation(&error) {
                    SubscriptionRepositoryError::missing_target(format!(
                        "user {follower} or {author} no longer exists"
                    ))
                } else {
                    map_diesel_error(error)
                }
            })?;
        Ok(())
    }

    async fn remove(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            subscriptions::table
                .filter(subscriptions::follower_id.eq(follower.get()))
                .filter(subscriptions::author_id.eq(author.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn followed_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i32> = subscriptions::table
            .filter(subscriptions::follower_id.eq(follower.get()))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(UserId::new).collect())
    }

    async fn followed_authors(
        &self,
        follower: UserId,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = subscriptions::table
            .inner_join(users::table)
            .filter(subscriptions::follower_id.eq(follower.get()))
            .select(UserRow::as_select())
            .order_by(users::username)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
