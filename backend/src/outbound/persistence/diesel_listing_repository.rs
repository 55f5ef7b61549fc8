//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ListingPersistenceError, ListingRepository};
use crate::domain::{Listing, ListingDetails, ListingId, Price, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{ListingRow, ListingUpdate, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::schema::listings;

/// Diesel-backed implementation of the `ListingRepository` port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListingPersistenceError {
    map_basic_pool_error(error, ListingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ListingPersistenceError {
    map_basic_diesel_error(
        error,
        ListingPersistenceError::query,
        ListingPersistenceError::connection,
    )
}

fn row_to_listing(row: ListingRow) -> Result<Listing, ListingPersistenceError> {
    let id = row.id;
    let corrupt = move |err: &dyn std::fmt::Display| {
        warn!(listing_id = %id, error = %err, "stored listing row failed validation");
        ListingPersistenceError::query(format!("stored listing {id} is invalid"))
    };
    let price = Price::from_minor_units(row.price_per_night_minor).map_err(|err| corrupt(&err))?;
    let details = ListingDetails::new(row.title, row.description, row.location, price)
        .map_err(|err| corrupt(&err))?;
    Ok(Listing::new(
        ListingId::from_uuid(row.id),
        UserId::from_uuid(row.host_id),
        details,
        row.created_at,
        row.updated_at,
    ))
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = listing.details();
        let row = NewListingRow {
            id: *listing.id().as_uuid(),
            host_id: *listing.host_id().as_uuid(),
            title: details.title(),
            description: details.description(),
            location: details.location(),
            price_per_night_minor: details.price_per_night().minor_units(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        };
        diesel::insert_into(listings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::ForeignKey { .. }) => {
                    ListingPersistenceError::missing_host(listing.host_id().to_string())
                }
                _ => map_diesel_error(err),
            })
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = listings::table
            .find(*id.as_uuid())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_listing).transpose()
    }

    async fn list(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ListingRow> = listings::table
            .select(ListingRow::as_select())
            .order((listings::created_at.desc(), listings::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_listing).collect()
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = listing.details();
        let changes = ListingUpdate {
            title: details.title(),
            description: details.description(),
            location: details.location(),
            price_per_night_minor: details.price_per_night().minor_units(),
            updated_at: listing.updated_at(),
        };
        let updated = diesel::update(listings::table.find(*listing.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(listings::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
