//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod bookings;
pub mod error;
pub mod health;
pub mod listings;
mod requester;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` route together with the extractor error handlers.
///
/// Mount inside a scope that carries the session middleware:
///
/// ```ignore
/// App::new().service(web::scope("/api/v1").wrap(session).configure(configure_api))
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::path_config())
        .service(auth::login)
        .service(auth::logout)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::replace_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(listings::list_listings)
        .service(listings::create_listing)
        .service(listings::get_listing)
        .service(listings::replace_listing)
        .service(listings::update_listing)
        .service(listings::delete_listing)
        .service(bookings::list_bookings)
        .service(bookings::create_booking)
        .service(bookings::get_booking)
        .service(bookings::replace_booking)
        .service(bookings::update_booking)
        .service(bookings::delete_booking);
}
