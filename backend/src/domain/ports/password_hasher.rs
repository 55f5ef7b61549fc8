//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hash computation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hash and verify account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash (algorithm, parameters, salt) for storage.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Check `plaintext` against a stored hash.
    fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
