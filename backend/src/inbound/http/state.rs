//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `web::Data<HttpState>` and depend only on
//! the driving ports, so they can be exercised without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BookingController, BookingRepository, ListingController, ListingRepository, LoginService,
    PasswordHasher, UserController, UserRepository,
};
use crate::domain::{AccountLoginService, BookingService, ListingService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserController>,
    pub listings: Arc<dyn ListingController>,
    pub bookings: Arc<dyn BookingController>,
}

impl HttpState {
    /// Wire the domain services over one set of repositories.
    pub fn from_repositories<U, L, B, H>(
        users: Arc<U>,
        listings: Arc<L>,
        bookings: Arc<B>,
        hasher: Arc<H>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        L: ListingRepository + 'static,
        B: BookingRepository + 'static,
        H: PasswordHasher + 'static,
    {
        Self {
            login: Arc::new(AccountLoginService::new(users.clone(), hasher.clone())),
            users: Arc::new(UserService::new(users, hasher, clock.clone())),
            listings: Arc::new(ListingService::new(listings.clone(), clock.clone())),
            bookings: Arc::new(BookingService::new(bookings, listings, clock)),
        }
    }
}
