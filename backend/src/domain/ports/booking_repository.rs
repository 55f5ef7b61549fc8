//! Port abstraction for booking persistence.
//!
//! Reads always take a [`BookingFilter`]; adapters translate it into their
//! own query language instead of exposing an unfiltered collection.
use async_trait::async_trait;

use crate::domain::{Booking, BookingFilter, BookingId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking repository adapters.
    pub enum BookingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// The referenced listing or customer does not exist.
        MissingReference { message: String } => "booking reference missing: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError>;

    /// Fetch a booking if it exists and passes `filter`.
    async fn find(
        &self,
        id: &BookingId,
        filter: &BookingFilter,
    ) -> Result<Option<Booking>, BookingPersistenceError>;

    /// Bookings passing `filter`, newest first.
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, BookingPersistenceError>;

    /// Returns `false` when no row matched.
    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: &BookingId) -> Result<bool, BookingPersistenceError>;
}
