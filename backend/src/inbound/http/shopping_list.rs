//! Shopping-list download.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, http::header, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_report_format;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DownloadParams {
    /// `txt` (default) or `csv`.
    pub format: Option<String>,
}

/// Download the aggregated ingredients of every recipe in the cart.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    params(DownloadParams),
    responses(
        (status = 200, description = "Report attachment", content_type = "text/plain", body = String),
        (status = 400, description = "Unsupported format", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<DownloadParams>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let format = parse_report_format(params.format.as_deref())?;
    let list = state.shopping_list.shopping_list(user).await?;
    info!(user = %user, items = list.items().len(), ?format, "shopping list exported");

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, format.content_type()))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format.file_name().to_owned())],
        })
        .body(list.render(format)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use mockall::predicate::eq;
    use rstest::rstest;

    use crate::domain::{CartIngredientLine, ShoppingList, UserId};
    use crate::inbound::http::test_utils::{
        MockPorts, login_shim, session_cookie, test_session_middleware,
    };

    fn cart() -> ShoppingList {
        ShoppingList::aggregate([
            CartIngredientLine::new("flour", "g", 200),
            CartIngredientLine::new("egg", "pc", 2),
            CartIngredientLine::new("flour", "g", 100),
        ])
    }

    #[rstest]
    #[case("", "shopping_list.txt", "Shopping list\n1. egg - 2 pc\n2. flour - 300 g\n")]
    #[case(
        "?format=csv",
        "shopping_list.csv",
        "position,name,amount,measurement_unit\r\n1,egg,2,pc\r\n2,flour,300,g\r\n"
    )]
    #[actix_web::test]
    async fn downloads_report_as_attachment(
        #[case] query: &str,
        #[case] file_name: &str,
        #[case] expected: &str,
    ) {
        let mut ports = MockPorts::default();
        ports
            .shopping_list
            .expect_shopping_list()
            .with(eq(UserId::new(1)))
            .return_once(|_| Ok(cart()));
        let app = test::init_service(
            App::new()
                .app_data(ports.into_state())
                .wrap(test_session_middleware())
                .configure(login_shim)
                .service(web::scope("/api/v1").service(download_shopping_cart)),
        )
        .await;
        let cookie = session_cookie(&app, 1).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/v1/recipes/download_shopping_cart{query}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .expect("content disposition")
            .to_owned();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains(file_name));
        assert_eq!(test::read_body(res).await, expected.as_bytes());
    }

    #[actix_web::test]
    async fn anonymous_download_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .app_data(MockPorts::default().into_state())
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(download_shopping_cart)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/recipes/download_shopping_cart")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
