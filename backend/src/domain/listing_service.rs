//! Listing resource controller.
//!
//! The full collection is always visible. Writes need an account but carry
//! no ownership check; see [`ListingPolicy`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ListingChanges, ListingController, ListingPersistenceError, ListingRepository,
    PendingChanges,
};
use crate::domain::{
    Action, Error, FieldViolation, Listing, ListingDetails, ListingId, ListingPolicy, Requester,
    ResourcePolicy, UpdateKind,
};

/// Listing service implementing the driving port.
#[derive(Clone)]
pub struct ListingService<L> {
    listings: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> ListingService<L> {
    pub fn new(listings: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { listings, clock }
    }
}

impl<L> ListingService<L>
where
    L: ListingRepository,
{
    fn map_persistence_error(error: ListingPersistenceError) -> Error {
        match error {
            ListingPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("listing repository unavailable: {message}"))
            }
            ListingPersistenceError::Query { message } => {
                Error::internal(format!("listing repository error: {message}"))
            }
            ListingPersistenceError::MissingHost { .. } => {
                Error::conflict("the signed-in account no longer exists")
            }
        }
    }

    fn listing_not_found() -> Error {
        Error::not_found("listing not found")
    }

    async fn load(&self, id: &ListingId) -> Result<Listing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::listing_not_found)
    }

    /// Collection check, lookup, then object check.
    async fn load_for(
        &self,
        requester: &Requester,
        id: &ListingId,
        action: Action,
    ) -> Result<Listing, Error> {
        let policy = ListingPolicy::for_action(action);
        policy.authorize(requester, action)?;
        let listing = self.load(id).await?;
        policy.authorize_object(requester, action, listing.host_id())?;
        Ok(listing)
    }
}

#[async_trait]
impl<L> ListingController for ListingService<L>
where
    L: ListingRepository,
{
    async fn list(&self, requester: &Requester) -> Result<Vec<Listing>, Error> {
        ListingPolicy::for_action(Action::List).authorize(requester, Action::List)?;
        self.listings
            .list()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn retrieve(&self, requester: &Requester, id: &ListingId) -> Result<Listing, Error> {
        self.load_for(requester, id, Action::Retrieve).await
    }

    async fn create(
        &self,
        requester: &Requester,
        details: ListingDetails,
    ) -> Result<Listing, Error> {
        ListingPolicy::for_action(Action::Create).authorize(requester, Action::Create)?;
        let host_id = requester.require_user_id()?.clone();
        let now = self.clock.utc();
        let listing = Listing::new(ListingId::random(), host_id, details, now, now);
        self.listings
            .insert(&listing)
            .await
            .map_err(Self::map_persistence_error)?;
        Ok(listing)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &ListingId,
        changes: PendingChanges<ListingChanges>,
        kind: UpdateKind,
    ) -> Result<Listing, Error> {
        let listing = self.load_for(requester, id, kind.action()).await?;
        let details = changes
            .decode(kind)?
            .apply(listing.details())
            .map_err(FieldViolation::into_error)?;
        let revised = listing.revise(details, self.clock.utc());
        let found = self
            .listings
            .update(&revised)
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::listing_not_found());
        }
        Ok(revised)
    }

    async fn destroy(&self, requester: &Requester, id: &ListingId) -> Result<(), Error> {
        let listing = self.load_for(requester, id, Action::Destroy).await?;
        let found = self
            .listings
            .delete(&listing.id())
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::listing_not_found());
        }
        Ok(())
    }
}
