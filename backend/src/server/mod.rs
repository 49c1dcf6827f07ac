//! HTTP server assembly: session cookies, API scope, health checks and docs.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use recipebook::Trace;
use recipebook::inbound::http::configure_api;
use recipebook::inbound::http::health::{HealthState, live, ready};
use recipebook::inbound::http::state::HttpState;

use state_builders::build_http_state;

/// Session lifetime before the authentication service must re-issue it.
const SESSION_TTL_HOURS: i64 = 12;

/// Cookie parameters shared by every worker.
#[derive(Clone)]
struct CookiePolicy {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl CookiePolicy {
    fn into_middleware(self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key)
            .cookie_name("session".to_owned())
            .cookie_http_only(true)
            .cookie_secure(self.secure)
            .cookie_same_site(self.same_site)
            .cookie_content_security(CookieContentSecurity::Private)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

fn build_app(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
    cookies: CookiePolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health)
        .app_data(state)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(cookies.into_middleware())
                .configure(configure_api),
        )
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = {
        use recipebook::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    app
}

/// Bind the listener and return the running server.
///
/// Readiness flips once the socket is bound.
///
/// # Errors
/// Returns the [`std::io::Error`] raised while binding.
pub fn create_server(health: web::Data<HealthState>, config: ServerConfig) -> std::io::Result<Server> {
    let state = build_http_state(&config);
    let cookies = CookiePolicy {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let worker_health = health.clone();

    let server = HttpServer::new(move || {
        build_app(worker_health.clone(), state.clone(), cookies.clone())
    })
    .bind(config.bind_addr)?
    .run();

    info!(addr = %config.bind_addr, "listening");
    health.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use recipebook::domain::RecipeLimits;

    use super::{
        CookiePolicy, HealthState, HttpState, Key, SameSite, ServerConfig, build_app,
        build_http_state, web,
    };

    fn in_memory_state() -> web::Data<HttpState> {
        let config = ServerConfig::new(
            Key::generate(),
            true,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
            RecipeLimits::default(),
        );
        build_http_state(&config)
    }

    fn cookies() -> CookiePolicy {
        CookiePolicy {
            key: Key::generate(),
            secure: true,
            same_site: SameSite::Lax,
        }
    }

    #[actix_web::test]
    async fn assembled_app_serves_health_and_api() {
        let health = web::Data::new(HealthState::new());
        let app =
            actix_test::init_service(build_app(health.clone(), in_memory_state(), cookies()))
                .await;

        let live = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(live.status(), StatusCode::OK);

        let tags = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/tags").to_request(),
        )
        .await;
        assert_eq!(tags.status(), StatusCode::OK);

        let me = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/users/me").to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn each_worker_gets_its_own_app() {
        let health = web::Data::new(HealthState::new());
        let state = in_memory_state();
        let policy = cookies();
        let factory = move || build_app(health.clone(), state.clone(), policy.clone());

        for _ in 0..2 {
            let app = actix_test::init_service(factory()).await;
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/api/v1/ingredients").to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
        }
    }
}
