//! Account resource controller.
//!
//! Implements [`UserController`] on top of the user repository and the
//! password hasher. Permission and payload shape per action come from
//! [`UserPolicy`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, PendingChanges, UserChanges, UserController,
    UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::hashing::off_worker;
use crate::domain::{
    Action, Error, FieldViolation, Requester, ResourcePolicy, UpdateKind, User, UserId,
    UserPolicy, field_error,
};

/// Account service implementing the driving port.
#[derive(Clone)]
pub struct UserService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service with the given repository, hasher and clock.
    pub fn new(users: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateUsername { .. } => field_error(
                "username",
                "unique",
                "a user with that username already exists",
            ),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    async fn hash_password(&self, plaintext: &str) -> Result<String, Error> {
        let plaintext = Zeroizing::new(plaintext.to_owned());
        off_worker(&self.hasher, move |hasher| hasher.hash(&plaintext))
            .await?
            .map_err(Self::map_hash_error)
    }

    fn user_not_found() -> Error {
        Error::not_found("user not found")
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(Self::user_not_found)
    }

    /// Create an administrator account outside the HTTP permission table.
    ///
    /// Operator tooling only; `isAdmin` can never be set through the API.
    pub async fn provision_admin(&self, registration: UserRegistration) -> Result<User, Error> {
        let UserRegistration { profile, password } = registration;
        let password_hash = self.hash_password(password.expose()).await?;
        let user = User::new(UserId::random(), profile, true, self.clock.utc());
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = %user.id(), "administrator provisioned");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> UserController for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn list(&self, requester: &Requester) -> Result<Vec<User>, Error> {
        UserPolicy::for_action(Action::List).authorize(requester, Action::List)?;
        self.users
            .list()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn retrieve(&self, requester: &Requester, id: &UserId) -> Result<User, Error> {
        let policy = UserPolicy::for_action(Action::Retrieve);
        policy.authorize(requester, Action::Retrieve)?;
        let user = self.load(id).await?;
        policy.authorize_object(requester, Action::Retrieve, user.id())?;
        Ok(user)
    }

    async fn create(
        &self,
        requester: &Requester,
        registration: UserRegistration,
    ) -> Result<User, Error> {
        UserPolicy::for_action(Action::Create).authorize(requester, Action::Create)?;

        let UserRegistration { profile, password } = registration;
        let password_hash = self.hash_password(password.expose()).await?;
        let user = User::new(UserId::random(), profile, false, self.clock.utc());
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(Self::map_persistence_error)?;

        info!(user_id = %user.id(), by_admin = requester.is_admin(), "account registered");
        Ok(user)
    }

    async fn update(
        &self,
        requester: &Requester,
        id: &UserId,
        changes: PendingChanges<UserChanges>,
        kind: UpdateKind,
    ) -> Result<User, Error> {
        let action = kind.action();
        let policy = UserPolicy::for_action(action);
        policy.authorize(requester, action)?;
        let user = self.load(id).await?;
        policy.authorize_object(requester, action, user.id())?;

        let profile = changes
            .decode(kind)?
            .apply(user.profile())
            .map_err(FieldViolation::into_error)?;
        let updated = user.with_profile(profile);
        let found = self
            .users
            .update(&updated)
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::user_not_found());
        }
        Ok(updated)
    }

    async fn destroy(&self, requester: &Requester, id: &UserId) -> Result<(), Error> {
        let policy = UserPolicy::for_action(Action::Destroy);
        policy.authorize(requester, Action::Destroy)?;
        let user = self.load(id).await?;
        policy.authorize_object(requester, Action::Destroy, user.id())?;

        let found = self
            .users
            .delete(user.id())
            .await
            .map_err(Self::map_persistence_error)?;
        if !found {
            return Err(Self::user_not_found());
        }
        info!(user_id = %user.id(), "account deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
