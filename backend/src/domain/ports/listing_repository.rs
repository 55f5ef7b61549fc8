//! Port abstraction for listing persistence.
use async_trait::async_trait;

use crate::domain::{Listing, ListingId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ListingPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing repository query failed: {message}",
        /// The host account no longer exists.
        MissingHost { host_id: String } => "listing host does not exist: {host_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, ListingPersistenceError>;

    /// All listings, newest first.
    async fn list(&self) -> Result<Vec<Listing>, ListingPersistenceError>;

    /// Returns `false` when no row matched.
    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError>;

    /// Remove a listing and its bookings. Returns `false` when no row matched.
    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError>;
}
