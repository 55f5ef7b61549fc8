//! Shared request-field parsing for inbound HTTP adapters.
//!
//! Request DTOs keep every field optional so that a missing field, a field of
//! the wrong shape and a field failing a domain rule all surface as the same
//! `invalid_request` envelope with `details.field` and `details.code`.

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidChoice,
    InvalidDecimal,
}

impl FieldCode {
    fn as_str(self) -> &'static str {
        match self {
            FieldCode::MissingField => "missing_field",
            FieldCode::InvalidUuid => "invalid_uuid",
            FieldCode::InvalidDate => "invalid_date",
            FieldCode::InvalidChoice => "invalid_choice",
            FieldCode::InvalidDecimal => "invalid_decimal",
        }
    }
}

fn field_error(
    field: &'static str,
    code: FieldCode,
    message: String,
    value: Option<&str>,
) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field, "code": code.as_str(), "value": value }),
        None => json!({ "field": field, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        FieldCode::MissingField,
        format!("missing required field: {field}"),
        None,
    )
}

/// Unwrap a field the current request shape requires.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_uuid(value: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_error(
            field,
            FieldCode::InvalidUuid,
            format!("{field} must be a valid UUID"),
            Some(value),
        )
    })
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            FieldCode::InvalidDate,
            format!("{field} must be a date formatted YYYY-MM-DD"),
            Some(value),
        )
    })
}

pub(crate) fn invalid_choice_error(field: &'static str, value: &str, expected: &str) -> Error {
    field_error(
        field,
        FieldCode::InvalidChoice,
        format!("{field} must be one of {expected}"),
        Some(value),
    )
}

pub(crate) fn invalid_decimal_error(field: &'static str, value: &str) -> Error {
    field_error(
        field,
        FieldCode::InvalidDecimal,
        format!("{field} must be a non-negative amount with at most two decimal places"),
        Some(value),
    )
}
