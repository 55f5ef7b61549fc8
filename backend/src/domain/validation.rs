//! Field-level validation failures and their error envelope.

use std::fmt;

use serde_json::json;

use super::Error;

/// A validation failure attributable to a single payload field.
pub trait FieldViolation: fmt::Display {
    /// Payload field (camelCase, as on the wire).
    fn field(&self) -> &'static str;

    /// Stable machine-readable code for the failure.
    fn code(&self) -> &'static str;

    /// Convert into a `400` domain error carrying `{field, code}` details.
    fn into_error(self) -> Error
    where
        Self: Sized,
    {
        field_error(self.field(), self.code(), self.to_string())
    }
}

/// Build an `invalid_request` error pointing at `field`.
///
/// # Examples
/// ```
/// use travel_backend::domain::{ErrorCode, field_error};
///
/// let err = field_error("title", "blank", "title must not be empty");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()), Some("title"));
/// ```
pub fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}
