//! Choose the driven adapters behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use recipebook::domain::RecipeLimits;
use recipebook::inbound::http::state::{HttpState, Repositories};
use recipebook::outbound::memory::InMemoryStore;
use recipebook::outbound::persistence::{
    DbPool, DieselIngredientRepository, DieselRecipeMarkRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselTagRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_state(pool: &DbPool, limits: RecipeLimits) -> HttpState {
    HttpState::from_repositories(
        Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tags: Arc::new(DieselTagRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
            marks: Arc::new(DieselRecipeMarkRepository::new(pool.clone())),
            subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        },
        limits,
    )
}

fn memory_state(limits: RecipeLimits) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    HttpState::from_repositories(
        Repositories {
            users: store.clone(),
            tags: store.clone(),
            ingredients: store.clone(),
            recipes: store.clone(),
            marks: store.clone(),
            subscriptions: store,
        },
        limits,
    )
}

/// Build handler state from PostgreSQL when a pool is configured, otherwise
/// from a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool, config.limits),
        None => {
            warn!("no database configured; data will not survive a restart");
            memory_state(config.limits)
        }
    };
    web::Data::new(state)
}
