//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! Reads honour a [`BookingFilter`] so the requester's queryset is applied
//! in SQL rather than after loading.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{BookingPersistenceError, BookingRepository};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, BookingTerms, ListingId, Stay, UserId,
};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{BookingRow, BookingTermsUpdate, NewBookingRow};
use super::pool::{DbPool, PoolError};
use super::schema::bookings;

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingPersistenceError {
    map_basic_pool_error(error, BookingPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BookingPersistenceError {
    map_basic_diesel_error(
        error,
        BookingPersistenceError::query,
        BookingPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> BookingPersistenceError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::ForeignKey { constraint }) => {
            BookingPersistenceError::missing_reference(
                constraint.unwrap_or_else(|| "bookings foreign key".to_owned()),
            )
        }
        _ => map_diesel_error(error),
    }
}

/// Start a boxed query narrowed to the filter.
fn filtered(filter: &BookingFilter) -> bookings::BoxedQuery<'static, Pg> {
    let mut query = bookings::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(bookings::status.eq(status.as_str()));
    }
    if let Some(customer) = &filter.customer {
        query = query.filter(bookings::customer_id.eq(*customer.as_uuid()));
    }
    query
}

fn row_to_booking(row: BookingRow) -> Result<Booking, BookingPersistenceError> {
    let id = row.id;
    let corrupt = move |err: &dyn std::fmt::Display| {
        warn!(booking_id = %id, error = %err, "stored booking row failed validation");
        BookingPersistenceError::query(format!("stored booking {id} is invalid"))
    };
    let stay = Stay::new(row.start_date, row.end_date).map_err(|err| corrupt(&err))?;
    let status = BookingStatus::from_str(&row.status).map_err(|err| corrupt(&err))?;
    let terms = BookingTerms {
        listing_id: ListingId::from_uuid(row.listing_id),
        stay,
        status,
    };
    Ok(Booking::new(
        BookingId::from_uuid(row.id),
        UserId::from_uuid(row.customer_id),
        terms,
        row.created_at,
    ))
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stay = booking.stay();
        let row = NewBookingRow {
            id: *booking.id().as_uuid(),
            listing_id: *booking.listing_id().as_uuid(),
            customer_id: *booking.customer().as_uuid(),
            start_date: stay.start(),
            end_date: stay.end(),
            status: booking.status().as_str(),
            created_at: booking.created_at(),
        };
        diesel::insert_into(bookings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_error)
    }

    async fn find(
        &self,
        id: &BookingId,
        filter: &BookingFilter,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = filtered(filter)
            .filter(bookings::id.eq(*id.as_uuid()))
            .first::<BookingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_booking).transpose()
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = filtered(filter)
            .order((bookings::created_at.desc(), bookings::id.asc()))
            .load::<BookingRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_booking).collect()
    }

    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stay = booking.stay();
        let changes = BookingTermsUpdate {
            listing_id: *booking.listing_id().as_uuid(),
            start_date: stay.start(),
            end_date: stay.end(),
            status: booking.status().as_str(),
        };
        let updated = diesel::update(bookings::table.find(*booking.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, BookingPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(bookings::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
