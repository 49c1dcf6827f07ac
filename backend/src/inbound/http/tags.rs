//! Tag handlers.

use actix_web::{get, web};

use crate::domain::{Error, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::TagResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// All tags ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags", body = [TagResponse]),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.tags.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// One tag.
#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such tag", body = Error)
    ),
    tags = ["tags"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagResponse>> {
    let id: TagId = parse_id(FieldName::new("id"), &path)?;
    Ok(web::Json(state.tags.get_tag(id).await?.into()))
}
