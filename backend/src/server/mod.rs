//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, HttpServer, web};
use tracing::info;

use travel_backend::Trace;
#[cfg(debug_assertions)]
use travel_backend::doc::ApiDoc;
use travel_backend::domain::Error;
use travel_backend::inbound::http::health::{HealthState, live, ready};
use travel_backend::inbound::http::session_config::SessionSettings;
use travel_backend::inbound::http::state::HttpState;
use travel_backend::inbound::http::{ApiResult, configure_api};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const SESSION_COOKIE: &str = "session";

/// Cookie-backed sessions: the signed-in account id, encrypted client side.
fn session_middleware(
    session: &SessionSettings,
    ttl: CookieDuration,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), session.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(session.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(session.same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(ttl))
        .build()
}

/// Unknown paths get the same JSON envelope as every other failure.
async fn unmatched_route() -> ApiResult<HttpResponse> {
    Err(Error::not_found("no route matches this path"))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1").wrap(session).configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched_route))
}

/// Bind the API server and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when building state, converting the session
/// lifetime or binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        session,
        session_ttl,
        bind_addr,
        db_pool: _,
    } = config;
    let ttl = CookieDuration::try_from(session_ttl)
        .map_err(|err| std::io::Error::other(format!("session lifetime: {err}")))?;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            session_middleware(&session, ttl),
        )
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, ttl_secs = session_ttl.as_secs(), "listening");
    health_state.mark_ready();
    Ok(server)
}
