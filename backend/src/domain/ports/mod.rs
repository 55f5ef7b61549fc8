//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_controller;
mod booking_repository;
mod listing_controller;
mod listing_repository;
mod login_service;
mod password_hasher;
mod pending_changes;
mod user_controller;
mod user_repository;

pub use booking_controller::{BookingChanges, BookingController, BookingRequest};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingPersistenceError, BookingRepository};
pub use listing_controller::{ListingChanges, ListingController};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingPersistenceError, ListingRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use pending_changes::PendingChanges;
pub use user_controller::{UserChanges, UserController, UserRegistration};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
