//! HTTP inbound adapter exposing the REST API.
//!
//! [`configure_api`] registers every endpoint under the caller's scope.
//! Literal segments such as `/users/me` and
//! `/recipes/download_shopping_cart` are registered before the `{id}`
//! patterns that would otherwise capture them.

pub mod error;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod shopping_list;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, query_error_handler};

/// Register API endpoints and extractor error handlers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use recipebook::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(users::list_users)
        .service(users::current_user)
        .service(users::subscriptions)
        .service(users::get_user)
        .service(users::subscribe)
        .service(users::unsubscribe)
        .service(tags::list_tags)
        .service(tags::get_tag)
        .service(ingredients::list_ingredients)
        .service(ingredients::get_ingredient)
        .service(shopping_list::download_shopping_cart)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(recipes::add_favorite)
        .service(recipes::remove_favorite)
        .service(recipes::add_to_shopping_cart)
        .service(recipes::remove_from_shopping_cart);
}
