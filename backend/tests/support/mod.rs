//! Shared helpers for the HTTP integration tests.
//!
//! Each test builds the full `/api/v1` surface over an in-memory store and
//! drives it through `actix_web::test`, carrying the session cookie by hand.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use travel_backend::Trace;
use travel_backend::domain::TRACE_ID_HEADER;
use travel_backend::inbound::http::configure_api;
use travel_backend::inbound::http::state::HttpState;
use travel_backend::inbound::http::test_utils::test_session_middleware;

pub const PASSWORD: &str = "correct-horse-battery";

/// Status, decoded body and trace header of one response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
    pub session: Option<Cookie<'static>>,
}

impl Reply {
    /// `details.field` of an error envelope.
    pub fn error_field(&self) -> Option<&str> {
        self.body
            .get("details")
            .and_then(|details| details.get("field"))
            .and_then(Value::as_str)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    pub fn id(&self) -> String {
        self.body
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| panic!("response has no id: {}", self.body))
    }
}

pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(test_session_middleware())
                    .configure(configure_api),
            ),
    )
    .await
}

/// Send a request, optionally with a JSON body and a session cookie.
pub async fn call<S>(
    app: &S,
    method: Method,
    uri: &str,
    body: Option<Value>,
    session: Option<&Cookie<'static>>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::default().method(method).uri(uri);
    if let Some(body) = body {
        request = request.set_json(body);
    }
    if let Some(cookie) = session {
        request = request.cookie(cookie.clone());
    }

    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let session = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    Reply {
        status,
        body,
        trace_id,
        session,
    }
}

/// Register `username` anonymously and return the created account.
pub async fn register<S>(app: &S, username: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD,
            "passwordConfirmation": PASSWORD,
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "register: {}", reply.body);
    reply.body
}

/// Log in and return the session cookie.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login: {}", reply.body);
    reply.session.expect("login sets the session cookie")
}

/// Register and log in, returning the account id and its session.
pub async fn sign_up<S>(app: &S, username: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let user = register(app, username).await;
    let id = user
        .get("id")
        .and_then(Value::as_str)
        .expect("user id")
        .to_owned();
    (id, login(app, username, PASSWORD).await)
}

/// Create a listing as `session` and return its id.
pub async fn create_listing<S>(app: &S, session: &Cookie<'static>, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        Method::POST,
        "/api/v1/listings",
        Some(json!({
            "title": title,
            "description": "Quiet street",
            "location": "Lisbon",
            "pricePerNight": "120.00",
        })),
        Some(session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "listing: {}", reply.body);
    reply.id()
}

/// Book `listing_id` as `session` and return the booking id.
pub async fn create_booking<S>(
    app: &S,
    session: &Cookie<'static>,
    listing_id: &str,
    status: Option<&str>,
) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut body = json!({
        "listingId": listing_id,
        "startDate": "2025-09-01",
        "endDate": "2025-09-04",
    });
    if let Some(status) = status {
        body["status"] = json!(status);
    }
    let reply = call(
        app,
        Method::POST,
        "/api/v1/bookings",
        Some(body),
        Some(session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "booking: {}", reply.body);
    reply.id()
}
