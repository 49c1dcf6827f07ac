//! User and subscription handlers.
//!
//! ```text
//! GET    /api/v1/users
//! GET    /api/v1/users/me
//! GET    /api/v1/users/subscriptions?recipes_limit=3
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/v1/users/{id}/subscribe
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{SubscriptionResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_recipes_limit};

/// Query parameters controlling subscription cards.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecipesLimitParams {
    /// Maximum number of recipes listed per author.
    #[param(value_type = Option<u32>, minimum = 0)]
    pub recipes_limit: Option<String>,
}

fn user_id_from_path(raw: &str) -> Result<UserId, Error> {
    parse_id(FieldName::new("id"), raw)
}

/// List every user, flagged with the viewer's subscriptions.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users ordered by username", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users(session.user_id()).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let viewer = session.require_user_id()?;
    let profile = state.users.current_user(viewer).await?;
    Ok(web::Json(profile.into()))
}

/// Authors followed by the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    params(RecipesLimitParams),
    responses(
        (status = 200, description = "Followed authors ordered by username", body = [SubscriptionResponse]),
        (status = 400, description = "Invalid recipes_limit", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<RecipesLimitParams>,
) -> ApiResult<web::Json<Vec<SubscriptionResponse>>> {
    let viewer = session.require_user_id()?;
    let limit = parse_recipes_limit(params.recipes_limit.as_deref())?;
    let cards = state
        .subscriptions_query
        .subscriptions(viewer, limit)
        .await?;
    Ok(web::Json(
        cards.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

/// One user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_id_from_path(&path)?;
    let profile = state.users.get_user(session.user_id(), id).await?;
    Ok(web::Json(profile.into()))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = i32, Path, description = "Author id"), RecipesLimitParams),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Self subscription or malformed input", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such author", body = Error),
        (status = 409, description = "Already subscribed", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    params: web::Query<RecipesLimitParams>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = user_id_from_path(&path)?;
    let limit = parse_recipes_limit(params.recipes_limit.as_deref())?;
    let card = state
        .subscriptions
        .subscribe(follower, author, limit)
        .await?;
    Ok(HttpResponse::Created().json(SubscriptionResponse::from(card)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "No such author or not subscribed", body = Error)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = user_id_from_path(&path)?;
    state.subscriptions.unsubscribe(follower, author).await?;
    Ok(HttpResponse::NoContent().finish())
}
