//! Domain primitives, access rules and resource controllers.
//!
//! Purpose: Define strongly typed entities used by the API and persistence
//! layers, the per-action permission tables, and the services implementing
//! the driving ports. Nothing here depends on HTTP or Diesel.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Listing, Booking: the three resources.
//! - Requester, Action, ActionPolicy: per-request access decisions.
//! - UserService, ListingService, BookingService: resource controllers.

pub mod auth;
pub mod booking;
pub mod booking_service;
pub mod error;
mod hashing;
pub mod listing;
pub mod listing_service;
pub mod login_service;
pub mod permissions;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::auth::{
    LoginCredentials, LoginValidationError, NewPassword, PASSWORD_MIN, PasswordValidationError,
};
pub use self::booking::{
    Booking, BookingId, BookingStatus, BookingTerms, BookingValidationError, Stay,
};
pub use self::booking_service::BookingService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::listing::{Listing, ListingDetails, ListingId, ListingValidationError, Price};
pub use self::listing_service::ListingService;
pub use self::login_service::AccountLoginService;
pub use self::permissions::{
    Action, ActionPolicy, BookingFilter, BookingPolicy, ListingPolicy, Permission, Requester,
    ResourcePolicy, SerializerShape, UpdateKind, UserPolicy, denial,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PersonName, User, UserId, UserProfile, UserValidationError, Username,
};
pub use self::user_service::UserService;
pub use self::validation::{FieldViolation, field_error};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use travel_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
