//! Reservations linking a customer to a listing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FieldViolation, ListingId, UserId};

/// Validation errors raised while building booking values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingValidationError {
    InvalidId,
    /// End date is not strictly after the start date.
    InvalidStay,
    UnknownStatus(String),
}

impl FieldViolation for BookingValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::InvalidStay => "endDate",
            Self::UnknownStatus(_) => "status",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::InvalidStay => "end_before_start",
            Self::UnknownStatus(_) => "invalid_choice",
        }
    }
}

impl fmt::Display for BookingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "booking id must be a valid UUID"),
            Self::InvalidStay => write!(f, "end date must be after start date"),
            Self::UnknownStatus(value) => write!(f, "\"{value}\" is not a valid status"),
        }
    }
}

impl std::error::Error for BookingValidationError {}

/// Stable booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Parse a booking identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, BookingValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| BookingValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[default]
    Confirmed,
    Canceled,
}

impl BookingStatus {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "canceled" => Ok(Self::Canceled),
            other => Err(BookingValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Check-in and check-out dates.
///
/// ## Invariants
/// - `end` is strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    start: NaiveDate,
    end: NaiveDate,
}

impl Stay {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, BookingValidationError> {
        if start >= end {
            return Err(BookingValidationError::InvalidStay);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of nights covered by the stay.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Client-writable booking attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingTerms {
    pub listing_id: ListingId,
    pub stay: Stay,
    pub status: BookingStatus,
}

/// A reservation.
///
/// ## Invariants
/// - `customer` is the account that created the booking and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    id: BookingId,
    customer: UserId,
    terms: BookingTerms,
    created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        id: BookingId,
        customer: UserId,
        terms: BookingTerms,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer,
            terms,
            created_at,
        }
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn customer(&self) -> &UserId {
        &self.customer
    }

    pub fn terms(&self) -> &BookingTerms {
        &self.terms
    }

    pub fn listing_id(&self) -> ListingId {
        self.terms.listing_id
    }

    pub fn stay(&self) -> Stay {
        self.terms.stay
    }

    pub fn status(&self) -> BookingStatus {
        self.terms.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the writable attributes; the customer is untouched.
    pub fn with_terms(mut self, terms: BookingTerms) -> Self {
        self.terms = terms;
        self
    }
}
