//! Bookable listings offered by hosts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FieldViolation, UserId};

/// Maximum length for titles and locations.
pub const LISTING_TEXT_MAX: usize = 255;
/// Largest accepted nightly price in minor units (99 999 999.99).
pub const PRICE_MAX_MINOR: i64 = 9_999_999_999;

/// Validation errors raised while building listing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyLocation,
    LocationTooLong { max: usize },
    InvalidPrice,
    NegativePrice,
    PriceTooPrecise,
    PriceTooLarge,
}

impl FieldViolation for ListingValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyLocation | Self::LocationTooLong { .. } => "location",
            Self::InvalidPrice
            | Self::NegativePrice
            | Self::PriceTooPrecise
            | Self::PriceTooLarge => "pricePerNight",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::EmptyTitle | Self::EmptyLocation => "blank",
            Self::TitleTooLong { .. } | Self::LocationTooLong { .. } => "max_length",
            Self::InvalidPrice => "invalid_decimal",
            Self::NegativePrice => "min_value",
            Self::PriceTooPrecise => "max_decimal_places",
            Self::PriceTooLarge => "max_digits",
        }
    }
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "listing id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyLocation => write!(f, "location must not be empty"),
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
            Self::InvalidPrice => write!(f, "price must be a decimal number"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::PriceTooPrecise => write!(f, "price must have at most 2 decimal places"),
            Self::PriceTooLarge => write!(f, "price is too large"),
        }
    }
}

impl std::error::Error for ListingValidationError {}

/// Stable listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Parse a listing identifier from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ListingValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ListingValidationError::InvalidId)
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

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Nightly price held in minor currency units.
///
/// Parsed from and rendered as a decimal string with two fractional digits.
///
/// # Examples
/// ```
/// use travel_backend::domain::Price;
///
/// let price: Price = "120.5".parse().unwrap();
/// assert_eq!(price.minor_units(), 12_050);
/// assert_eq!(price.to_string(), "120.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    /// Build a price from minor units.
    pub fn from_minor_units(minor: i64) -> Result<Self, ListingValidationError> {
        if minor < 0 {
            return Err(ListingValidationError::NegativePrice);
        }
        if minor > PRICE_MAX_MINOR {
            return Err(ListingValidationError::PriceTooLarge);
        }
        Ok(Self(minor))
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = ListingValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix('-') {
            // Reject "-0.5" as negative, but still report garbage as garbage.
            return match parse_unsigned(rest) {
                Ok(0) => Ok(Self(0)),
                Ok(_) => Err(ListingValidationError::NegativePrice),
                Err(err) => Err(err),
            };
        }
        Self::from_minor_units(parse_unsigned(raw)?)
    }
}

fn parse_unsigned(raw: &str) -> Result<i64, ListingValidationError> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
        return Err(ListingValidationError::InvalidPrice);
    }
    if raw.ends_with('.') {
        return Err(ListingValidationError::InvalidPrice);
    }
    if fraction.len() > 2 {
        return Err(ListingValidationError::PriceTooPrecise);
    }
    let whole: i64 = whole
        .parse()
        .map_err(|_| ListingValidationError::PriceTooLarge)?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
        _ => fraction
            .parse()
            .map_err(|_| ListingValidationError::InvalidPrice)?,
    };
    whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(cents))
        .filter(|value| *value <= PRICE_MAX_MINOR)
        .ok_or(ListingValidationError::PriceTooLarge)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Client-writable listing attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetails {
    title: String,
    description: String,
    location: String,
    price_per_night: Price,
}

impl ListingDetails {
    /// Validate listing attributes.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        price_per_night: Price,
    ) -> Result<Self, ListingValidationError> {
        let title = title.into();
        let location = location.into();
        check_text(
            &title,
            ListingValidationError::EmptyTitle,
            ListingValidationError::TitleTooLong {
                max: LISTING_TEXT_MAX,
            },
        )?;
        check_text(
            &location,
            ListingValidationError::EmptyLocation,
            ListingValidationError::LocationTooLong {
                max: LISTING_TEXT_MAX,
            },
        )?;
        Ok(Self {
            title,
            description: description.into(),
            location,
            price_per_night,
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    pub fn price_per_night(&self) -> Price {
        self.price_per_night
    }
}

fn check_text(
    value: &str,
    empty: ListingValidationError,
    too_long: ListingValidationError,
) -> Result<(), ListingValidationError> {
    if value.trim().is_empty() {
        return Err(empty);
    }
    if value.chars().count() > LISTING_TEXT_MAX {
        return Err(too_long);
    }
    Ok(())
}

/// A bookable offering.
///
/// ## Invariants
/// - `host_id` is fixed at creation.
/// - `updated_at >= created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    id: ListingId,
    host_id: UserId,
    details: ListingDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        id: ListingId,
        host_id: UserId,
        details: ListingDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            host_id,
            details,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn host_id(&self) -> &UserId {
        &self.host_id
    }

    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the writable attributes and stamp the modification time.
    pub fn revise(mut self, details: ListingDetails, at: DateTime<Utc>) -> Self {
        self.details = details;
        self.updated_at = at.max(self.created_at);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("120", 12_000)]
    #[case("120.5", 12_050)]
    #[case("120.55", 12_055)]
    #[case("0", 0)]
    #[case("-0.00", 0)]
    #[case(" 7.05 ", 705)]
    fn price_parses_decimal_strings(#[case] raw: &str, #[case] minor: i64) {
        let price: Price = raw.parse().expect("valid price");
        assert_eq!(price.minor_units(), minor);
    }

    #[rstest]
    #[case("", ListingValidationError::InvalidPrice)]
    #[case("abc", ListingValidationError::InvalidPrice)]
    #[case("1.", ListingValidationError::InvalidPrice)]
    #[case(".5", ListingValidationError::InvalidPrice)]
    #[case("1e3", ListingValidationError::InvalidPrice)]
    #[case("-1", ListingValidationError::NegativePrice)]
    #[case("1.005", ListingValidationError::PriceTooPrecise)]
    #[case("100000000", ListingValidationError::PriceTooLarge)]
    #[case("99999999999999999999", ListingValidationError::PriceTooLarge)]
    fn price_rejects_invalid_strings(#[case] raw: &str, #[case] expected: ListingValidationError) {
        assert_eq!(raw.parse::<Price>(), Err(expected));
    }

    #[rstest]
    #[case(12_000, "120.00")]
    #[case(5, "0.05")]
    #[case(PRICE_MAX_MINOR, "99999999.99")]
    fn price_renders_two_decimals(#[case] minor: i64, #[case] expected: &str) {
        let price = Price::from_minor_units(minor).expect("valid price");
        assert_eq!(price.to_string(), expected);
    }

    #[rstest]
    fn details_validate_text_fields() {
        let price = Price::from_minor_units(100).expect("valid price");
        assert_eq!(
            ListingDetails::new(" ", "", "Lisbon", price),
            Err(ListingValidationError::EmptyTitle)
        );
        let err = ListingDetails::new("Loft", "", "x".repeat(LISTING_TEXT_MAX + 1), price)
            .expect_err("location too long");
        assert_eq!(err.field(), "location");
        assert_eq!(err.code(), "max_length");
    }

    #[rstest]
    fn revise_keeps_host_and_creation_time() {
        let price = Price::from_minor_units(100).expect("valid price");
        let created = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp");
        let later = DateTime::<Utc>::from_timestamp(1_700_000_600, 0).expect("timestamp");
        let host = UserId::random();
        let listing = Listing::new(
            ListingId::random(),
            host.clone(),
            ListingDetails::new("Loft", "", "Lisbon", price).expect("valid"),
            created,
            created,
        );

        let revised = listing.revise(
            ListingDetails::new("Attic", "cosy", "Porto", price).expect("valid"),
            later,
        );

        assert_eq!(revised.host_id(), &host);
        assert_eq!(revised.created_at(), created);
        assert_eq!(revised.updated_at(), later);
        assert_eq!(revised.details().title(), "Attic");
    }
}
