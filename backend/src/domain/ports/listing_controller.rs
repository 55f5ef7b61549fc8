//! Driving port for the listing resource.

use async_trait::async_trait;

use super::PendingChanges;
use crate::domain::{
    Error, Listing, ListingDetails, ListingId, ListingValidationError, Price, Requester,
    UpdateKind,
};

/// Listing fields supplied by an update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<Price>,
}

impl ListingChanges {
    /// Merge the supplied fields over `current` and revalidate.
    pub fn apply(self, current: &ListingDetails) -> Result<ListingDetails, ListingValidationError> {
        ListingDetails::new(
            self.title.unwrap_or_else(|| current.title().to_owned()),
            self.description
                .unwrap_or_else(|| current.description().to_owned()),
            self.location.unwrap_or_else(|| current.location().to_owned()),
            self.price_per_night
                .unwrap_or_else(|| current.price_per_night()),
        )
    }
}

/// CRUD over listings, newest first.
#[async_trait]
pub trait ListingController: Send + Sync {
    async fn list(&self, requester: &Requester) -> Result<Vec<Listing>, Error>;

    async fn retrieve(&self, requester: &Requester, id: &ListingId) -> Result<Listing, Error>;

    /// Create a listing hosted by the requester.
    async fn create(&self, requester: &Requester, details: ListingDetails)
    -> Result<Listing, Error>;

    async fn update(
        &self,
        requester: &Requester,
        id: &ListingId,
        changes: PendingChanges<ListingChanges>,
        kind: UpdateKind,
    ) -> Result<Listing, Error>;

    async fn destroy(&self, requester: &Requester, id: &ListingId) -> Result<(), Error>;
}
