//! Ingredient handlers.
//!
//! `GET /api/v1/ingredients?name=sal` ranks prefix matches before
//! substring matches; without `name` every ingredient is listed by name.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, IngredientId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::IngredientResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct IngredientSearchParams {
    /// Case-insensitive fragment of the ingredient name.
    pub name: Option<String>,
}

/// Search or list ingredients.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(IngredientSearchParams),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientResponse]),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    params: web::Query<IngredientSearchParams>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let ingredients = state
        .ingredients
        .list_ingredients(params.into_inner().name)
        .await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

/// One ingredient.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i32, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "No such ingredient", body = Error)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let id: IngredientId = parse_id(FieldName::new("id"), &path)?;
    Ok(web::Json(state.ingredients.get_ingredient(id).await?.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use serde_json::Value;

    use crate::domain::Ingredient;
    use crate::inbound::http::test_utils::MockPorts;

    #[actix_web::test]
    async fn forwards_search_fragment() {
        let mut ports = MockPorts::default();
        ports
            .ingredients
            .expect_list_ingredients()
            .with(eq(Some("соль".to_owned())))
            .return_once(|_| {
                Ok(vec![Ingredient {
                    id: IngredientId::new(3),
                    name: "Соль".into(),
                    measurement_unit: "г".into(),
                }])
            });
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api/v1").service(list_ingredients)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/ingredients?name=%D1%81%D0%BE%D0%BB%D1%8C")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["measurement_unit"], "г");
    }

    #[actix_web::test]
    async fn lists_everything_without_name() {
        let mut ports = MockPorts::default();
        ports
            .ingredients
            .expect_list_ingredients()
            .with(eq(None))
            .return_once(|_| Ok(Vec::new()));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api/v1").service(list_ingredients)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/ingredients").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
