//! In-process store backing every repository port.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! It mirrors the PostgreSQL schema's integrity rules: unique usernames,
//! foreign keys checked on write, and cascading deletes from users to
//! listings to bookings.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    BookingPersistenceError, BookingRepository, ListingPersistenceError, ListingRepository,
    StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{Booking, BookingFilter, BookingId, Listing, ListingId, User, UserId};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, StoredUser>,
    listings: HashMap<ListingId, Listing>,
    bookings: HashMap<BookingId, Booking>,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<&UserId>) -> bool {
        self.users.values().any(|stored| {
            stored.user.username().as_ref() == username && Some(stored.user.id()) != except
        })
    }

    fn remove_listing_cascade(&mut self, id: &ListingId) -> bool {
        let removed = self.listings.remove(id).is_some();
        if removed {
            self.bookings.retain(|_, booking| booking.listing_id() != *id);
        }
        removed
    }

    fn remove_user_cascade(&mut self, id: &UserId) -> bool {
        if self.users.remove(id).is_none() {
            return false;
        }
        let hosted: Vec<ListingId> = self
            .listings
            .values()
            .filter(|listing| listing.host_id() == id)
            .map(Listing::id)
            .collect();
        for listing_id in hosted {
            self.remove_listing_cascade(&listing_id);
        }
        self.bookings.retain(|_, booking| booking.customer() != id);
        true
    }
}

/// Mutex-guarded tables implementing the user, listing and booking ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if tables.username_taken(user.username().as_ref(), None) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        tables.users.insert(
            user.id().clone(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
            .map(|stored| StoredCredentials {
                user_id: stored.user.id().clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::query)?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by_key(|user| (Reverse(user.date_joined()), *user.id().as_uuid()));
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        if !tables.users.contains_key(user.id()) {
            return Ok(false);
        }
        if tables.username_taken(user.username().as_ref(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        if let Some(stored) = tables.users.get_mut(user.id()) {
            stored.user = stored.user.clone().with_profile(user.profile().clone());
        }
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::query)?;
        Ok(tables.remove_user_cascade(id))
    }
}

#[async_trait]
impl ListingRepository for InMemoryStore {
    async fn insert(&self, listing: &Listing) -> Result<(), ListingPersistenceError> {
        let mut tables = self.lock().map_err(ListingPersistenceError::query)?;
        if !tables.users.contains_key(listing.host_id()) {
            return Err(ListingPersistenceError::missing_host(
                listing.host_id().to_string(),
            ));
        }
        tables.listings.insert(listing.id(), listing.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<Listing>, ListingPersistenceError> {
        let tables = self.lock().map_err(ListingPersistenceError::query)?;
        Ok(tables.listings.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
        let tables = self.lock().map_err(ListingPersistenceError::query)?;
        let mut listings: Vec<Listing> = tables.listings.values().cloned().collect();
        listings.sort_by_key(|listing| (Reverse(listing.created_at()), *listing.id().as_uuid()));
        Ok(listings)
    }

    async fn update(&self, listing: &Listing) -> Result<bool, ListingPersistenceError> {
        let mut tables = self.lock().map_err(ListingPersistenceError::query)?;
        match tables.listings.get_mut(&listing.id()) {
            Some(stored) => {
                *stored = listing.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingPersistenceError> {
        let mut tables = self.lock().map_err(ListingPersistenceError::query)?;
        Ok(tables.remove_listing_cascade(id))
    }
}

fn check_references(tables: &Tables, booking: &Booking) -> Result<(), BookingPersistenceError> {
    if !tables.listings.contains_key(&booking.listing_id()) {
        return Err(BookingPersistenceError::missing_reference(format!(
            "listing {}",
            booking.listing_id()
        )));
    }
    if !tables.users.contains_key(booking.customer()) {
        return Err(BookingPersistenceError::missing_reference(format!(
            "customer {}",
            booking.customer()
        )));
    }
    Ok(())
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert(&self, booking: &Booking) -> Result<(), BookingPersistenceError> {
        let mut tables = self.lock().map_err(BookingPersistenceError::query)?;
        check_references(&tables, booking)?;
        tables.bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: &BookingId,
        filter: &BookingFilter,
    ) -> Result<Option<Booking>, BookingPersistenceError> {
        let tables = self.lock().map_err(BookingPersistenceError::query)?;
        Ok(tables
            .bookings
            .get(id)
            .filter(|booking| filter.matches(booking.status(), booking.customer()))
            .cloned())
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, BookingPersistenceError> {
        let tables = self.lock().map_err(BookingPersistenceError::query)?;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| filter.matches(booking.status(), booking.customer()))
            .cloned()
            .collect();
        bookings.sort_by_key(|booking| (Reverse(booking.created_at()), *booking.id().as_uuid()));
        Ok(bookings)
    }

    async fn update(&self, booking: &Booking) -> Result<bool, BookingPersistenceError> {
        let mut tables = self.lock().map_err(BookingPersistenceError::query)?;
        if !tables.bookings.contains_key(&booking.id()) {
            return Ok(false);
        }
        check_references(&tables, booking)?;
        tables.bookings.insert(booking.id(), booking.clone());
        Ok(true)
    }

    async fn delete(&self, id: &BookingId) -> Result<bool, BookingPersistenceError> {
        let mut tables = self.lock().map_err(BookingPersistenceError::query)?;
        Ok(tables.bookings.remove(id).is_some())
    }
}
