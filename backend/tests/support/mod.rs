//! Shared harness for HTTP integration tests.
//!
//! The API runs against [`InMemoryStore`] with a stand-in for the external
//! authentication service: `POST /test/login/{id}` writes the session
//! cookie the real service would issue.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use serde_json::Value;

use recipebook::domain::{Ingredient, NewIngredient, NewTag, RecipeLimits, Tag, User, UserId};
use recipebook::inbound::http::ApiResult;
use recipebook::inbound::http::session::SessionContext;
use recipebook::inbound::http::state::{HttpState, Repositories};
use recipebook::outbound::memory::InMemoryStore;

/// Fixture data shared by the scenarios.
pub struct World {
    pub store: InMemoryStore,
    pub alice: User,
    pub bob: User,
    pub flour: Ingredient,
    pub egg: Ingredient,
    pub milk: Ingredient,
    pub breakfast: Tag,
    pub dinner: Tag,
}

impl World {
    pub async fn seeded() -> Self {
        let store = InMemoryStore::new();
        let alice = store
            .add_user("alice", "alice@example.com", "Alice", "Baker")
            .await;
        let bob = store
            .add_user("bob", "bob@example.com", "Bob", "Cook")
            .await;
        let flour = store
            .add_ingredient(&NewIngredient::try_new("flour", "g").expect("ingredient"))
            .await;
        let egg = store
            .add_ingredient(&NewIngredient::try_new("egg", "pc").expect("ingredient"))
            .await;
        let milk = store
            .add_ingredient(&NewIngredient::try_new("milk", "ml").expect("ingredient"))
            .await;
        let breakfast = store
            .add_tag(&NewTag::try_new("Breakfast", "#E26C2D", "breakfast").expect("tag"))
            .await
            .expect("tag inserted");
        let dinner = store
            .add_tag(&NewTag::try_new("Dinner", "#8775D2", "dinner").expect("tag"))
            .await
            .expect("tag inserted");
        Self {
            store,
            alice,
            bob,
            flour,
            egg,
            milk,
            breakfast,
            dinner,
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        let store = Arc::new(self.store.clone());
        web::Data::new(HttpState::from_repositories(
            Repositories {
                users: store.clone(),
                tags: store.clone(),
                ingredients: store.clone(),
                recipes: store.clone(),
                marks: store.clone(),
                subscriptions: store,
            },
            RecipeLimits::default(),
        ))
    }
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

async fn login(path: web::Path<i32>, session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stand-in for the authentication service.
pub fn login_shim(cfg: &mut web::ServiceConfig) {
    cfg.route("/test/login/{id}", web::post().to(login));
}

/// Build the full application around a [`World`].
macro_rules! api_app {
    ($world:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($world.state())
                .wrap($crate::support::session_middleware())
                .wrap(recipebook::Trace)
                .service(
                    actix_web::web::scope("/api/v1")
                        .configure(recipebook::inbound::http::configure_api),
                )
                .configure($crate::support::login_shim),
        )
    };
}

pub async fn sign_in<S, B>(app: &S, user: &User) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/login/{}", user.id))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Send a request and decode the JSON body (or `Null` when empty).
pub async fn send<S, B>(app: &S, request: Request) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, request).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&body).into_owned())
        })
    };
    (status, value)
}

/// Request body for a recipe using the given `(ingredient, amount)` lines.
pub fn recipe_body(name: &str, lines: &[(&Ingredient, i64)], tags: &[&Tag]) -> Value {
    serde_json::json!({
        "name": name,
        "image": format!("recipes/{}.png", name.to_lowercase()),
        "text": format!("How to make {name}."),
        "cooking_time": 15,
        "ingredients": lines
            .iter()
            .map(|(ingredient, amount)| serde_json::json!({"id": ingredient.id, "amount": amount}))
            .collect::<Vec<_>>(),
        "tags": tags.iter().map(|tag| tag.id).collect::<Vec<_>>(),
    })
}
