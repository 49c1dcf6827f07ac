//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use std::sync::Arc;

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{
    MockIngredientsQuery, MockRecipeMarksCommand, MockRecipesCommand, MockRecipesQuery,
    MockShoppingListQuery, MockSubscriptionsCommand, MockSubscriptionsQuery, MockTagsQuery,
    MockUsersQuery,
};
use crate::domain::{User, UserId};

/// Session middleware with a fresh key and the `Secure` flag disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn login(path: web::Path<i32>, session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stand-in for the authentication service: `POST /test/login/{id}`.
pub fn login_shim(cfg: &mut web::ServiceConfig) {
    cfg.route("/test/login/{id}", web::post().to(login));
}

/// Sign in through [`login_shim`] and return the session cookie.
pub async fn session_cookie<S, B>(app: &S, user_id: i32) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/login/{user_id}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Mock driving ports; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUsersQuery,
    pub subscriptions: MockSubscriptionsCommand,
    pub subscriptions_query: MockSubscriptionsQuery,
    pub tags: MockTagsQuery,
    pub ingredients: MockIngredientsQuery,
    pub recipes: MockRecipesCommand,
    pub recipes_query: MockRecipesQuery,
    pub recipe_marks: MockRecipeMarksCommand,
    pub shopping_list: MockShoppingListQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            users: Arc::new(self.users),
            subscriptions: Arc::new(self.subscriptions),
            subscriptions_query: Arc::new(self.subscriptions_query),
            tags: Arc::new(self.tags),
            ingredients: Arc::new(self.ingredients),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
            recipe_marks: Arc::new(self.recipe_marks),
            shopping_list: Arc::new(self.shopping_list),
        })
    }
}

/// A user with predictable fields derived from `id`.
pub fn sample_user(id: i32) -> User {
    User {
        id: UserId::new(id),
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        first_name: "Test".to_owned(),
        last_name: format!("User {id}"),
    }
}
