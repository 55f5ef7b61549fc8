//! Driving port for the booking resource.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::PendingChanges;
use crate::domain::{
    Booking, BookingId, BookingStatus, BookingTerms, BookingValidationError, Error, ListingId,
    Requester, Stay, UpdateKind,
};

/// Booking creation payload. The customer is never part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub listing_id: ListingId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<BookingStatus>,
}

impl BookingRequest {
    /// Validate into booking terms, defaulting the status to confirmed.
    pub fn into_terms(self) -> Result<BookingTerms, BookingValidationError> {
        Ok(BookingTerms {
            listing_id: self.listing_id,
            stay: Stay::new(self.start_date, self.end_date)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Booking fields supplied by an update; `None` keeps the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingChanges {
    pub listing_id: Option<ListingId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

impl BookingChanges {
    /// Merge the supplied fields over `current` and revalidate the stay.
    pub fn apply(self, current: &BookingTerms) -> Result<BookingTerms, BookingValidationError> {
        Ok(BookingTerms {
            listing_id: self.listing_id.unwrap_or(current.listing_id),
            stay: Stay::new(
                self.start_date.unwrap_or(current.stay.start()),
                self.end_date.unwrap_or(current.stay.end()),
            )?,
            status: self.status.unwrap_or(current.status),
        })
    }
}

/// CRUD over the bookings visible to the requester.
#[async_trait]
pub trait BookingController: Send + Sync {
    async fn list(&self, requester: &Requester) -> Result<Vec<Booking>, Error>;

    async fn retrieve(&self, requester: &Requester, id: &BookingId) -> Result<Booking, Error>;

    /// Create a booking whose customer is the requester.
    async fn create(&self, requester: &Requester, request: BookingRequest)
    -> Result<Booking, Error>;

    async fn update(
        &self,
        requester: &Requester,
        id: &BookingId,
        changes: PendingChanges<BookingChanges>,
        kind: UpdateKind,
    ) -> Result<Booking, Error>;

    async fn destroy(&self, requester: &Requester, id: &BookingId) -> Result<(), Error>;
}
