//! Driving port for login and requester resolution.
//!
//! Inbound adapters call it to authenticate credentials and to turn the user
//! id held in a session into a [`Requester`] without touching persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Requester, UserId};

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Resolve the caller from the user id stored in their session, if any.
    ///
    /// A session naming an account that no longer exists resolves to
    /// [`Requester::Anonymous`].
    async fn requester(&self, session_user: Option<&UserId>) -> Result<Requester, Error>;
}
