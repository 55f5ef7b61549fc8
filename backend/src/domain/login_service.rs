//! Credential verification and requester resolution backed by stored accounts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::hashing::off_worker;
use crate::domain::ports::{LoginService, PasswordHasher, UserPersistenceError, UserRepository};
use crate::domain::{Error, LoginCredentials, Requester, UserId};

/// [`LoginService`] that checks Argon2 hashes held by the user repository.
#[derive(Clone)]
pub struct AccountLoginService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountLoginService<R, H> {
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[async_trait]
impl<R, H> LoginService for AccountLoginService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_persistence_error)?;
        let plaintext = Zeroizing::new(credentials.password().to_owned());
        let Some(stored) = stored else {
            // Spend one hash so unknown usernames cost as much as wrong passwords.
            let spent = off_worker(&self.hasher, move |hasher| hasher.hash(&plaintext)).await?;
            if let Err(err) = spent {
                debug!(error = %err, "equalising hash failed");
            }
            debug!("login attempt for unknown username");
            return Err(invalid_credentials());
        };

        let user_id = stored.user_id.clone();
        let verified = off_worker(&self.hasher, move |hasher| {
            hasher.verify(&plaintext, &stored.password_hash)
        })
        .await?
        .map_err(|err| {
            warn!(%user_id, error = %err, "stored password hash unusable");
            Error::internal(format!("password verification failed: {err}"))
        })?;
        if verified {
            Ok(user_id)
        } else {
            Err(invalid_credentials())
        }
    }

    async fn requester(&self, session_user: Option<&UserId>) -> Result<Requester, Error> {
        let Some(id) = session_user else {
            return Ok(Requester::Anonymous);
        };
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?;
        match user {
            Some(user) => Ok(Requester::user(user.id().clone(), user.is_admin())),
            None => {
                warn!(user_id = %id, "session references a deleted account");
                Ok(Requester::Anonymous)
            }
        }
    }
}
