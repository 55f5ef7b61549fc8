//! Booking resource controller.
//!
//! Every read and every per-id write goes through the requester's queryset:
//! confirmed bookings, narrowed to the requester's own when signed in. A
//! booking outside that set is reported as missing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    BookingChanges, BookingController, BookingPersistenceError, BookingRepository,
    BookingRequest, ListingPersistenceError, ListingRepository, PendingChanges,
};
use crate::domain::{
    Action, Booking, BookingFilter, BookingId, BookingPolicy, Error, FieldViolation, ListingId,
    Requester, ResourcePolicy, UpdateKind, field_error,
};

/// Booking service implementing the driving port.
#[derive(Clone)]
pub struct BookingService<B, L> {
    bookings: Arc<B>,
    listings: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<B, L> BookingService<B, L> {
    pub fn new(bookings: Arc<B>, listings: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings,
            listings,
            clock,
        }
    }
}

impl<B, L> BookingService<B, L>
where
    B: BookingRepository,
    L: ListingRepository,
{
    fn map_persistence_error(error: BookingPersistenceError) -> Error {
        match error {
            BookingPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("booking repository unavailable: {message}"))
            }
            BookingPersistenceError::Query { message } => {
                Error::internal(format!("booking repository error: {message}"))
            }
            BookingPersistenceError::MissingReference { message } => {
                debug!(%message, "booking write lost a foreign key race");
                unknown_listing_error()
            }
        }
    }

    fn map_listing_error(error: ListingPersistenceError) -> Error {
        match error {
            ListingPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("listing repository unavailable: {message}"))
            }
            other => Error::internal(format!("listing repository error: {other}")),
        }
    }

    fn booking_not_found() -> Error {
        Error::not_found("booking not found")
    }

    async fn ensure_listing_exists(&self, id: &ListingId) -> Result<(), Error> {
        let listing = self
            .listings
            .find_by_id(id)
            .await
            .map_err(Self::map_listing_error)?;
        match listing {
            Some(_) => Ok(()),
            None => Err(unknown_listing_error()),
        }
    }

    /// Collection check, lookup through the queryset, then object check.
    async fn load_for(
        &self,
        requester: &Requester,
        id: &BookingId,
        action: Action,
    ) -> Result<Booking, Error> {
        let policy = BookingPolicy::for_action(action);
        policy.authorize(requester, action)?;
        let filter = BookingFilter::visible_to(requester);
        let booking = self
            .bookings
            .find(id, &filter)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::booking_not_found)?;
        policy.authorize_object(requester, action, booking.customer())?;
        Ok(booking)
    }
}

fn unknown_listing_error() -> Error {
    field_error(
        "listingId",
        "does_not_exist",
        "the referenced listing does not exist",
    )
}

#[async_trait]
impl<B, L> BookingController for BookingService<B, L>
where
    B: BookingRepository,
    L: ListingRepository,
{
    async fn list(&self, requester: &Requester) -> Result<Vec<Booking>, Error> {
        BookingPolicy::for_action(Action::List).authorize(requester, Action::List)?;
        let filter = BookingFilter::visible_to(requester);
        self.bookings
            .list(&filter)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn retrieve(&self, requester: &Requester, id: &BookingId) -> Result<Booking, Error> {
        self.load_for(requester, id, Action::Retrieve).await
    }

    async fn create(
        &self,
        requester: &Requester,
        request: BookingRequest,
    ) -> Result<Booking, Error> {
        BookingPolicy::for_action(Action::Create).authorize(requester, Action::Create)?;
        let customer = requester.require_user_id()?.clone();

        let terms = request.into_terms().map_err(FieldViolation::into_error)?;
        self.ensure_listing_exists(&terms.listing_id).await?;

        let booking = Booking::new(BookingId::random(), customer, terms, self.clock.utc());
        self.bookings
            .insert(&booking)
            .await
            .map_err(Self::map_persistence_error)?;
        Ok(booking)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &BookingId,
        changes: PendingChanges<BookingChanges>,
        kind: UpdateKind,
    ) -> Result<Booking, Error> {
        let booking = self.load_for(requester, id, kind.action()).await?;
        let terms = changes
            .decode(kind)?
            .apply(booking.terms())
            .map_err(FieldViolation::into_error)?;
        if terms.listing_id != booking.listing_id() {
            self.ensure_listing_exists(&terms.listing_id).await?;
        }

        let updated = booking.with_terms(terms);
        let found = self
            .bookings
            .update(&updated)
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::booking_not_found());
        }
        Ok(updated)
    }

    async fn destroy(&self, requester: &Requester, id: &BookingId) -> Result<(), Error> {
        let booking = self.load_for(requester, id, Action::Destroy).await?;
        let found = self
            .bookings
            .delete(&booking.id())
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::booking_not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
