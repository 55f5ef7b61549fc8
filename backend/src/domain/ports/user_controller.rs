//! Driving port for the account resource.

use async_trait::async_trait;

use super::PendingChanges;
use crate::domain::{
    EmailAddress, Error, NewPassword, PersonName, Requester, UpdateKind, User, UserId,
    UserProfile, UserValidationError, Username,
};

/// Registration payload: profile plus a confirmed password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    pub profile: UserProfile,
    pub password: NewPassword,
}

/// Profile fields supplied by an update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserChanges {
    /// Merge the supplied fields over `current`.
    pub fn apply(self, current: &UserProfile) -> Result<UserProfile, UserValidationError> {
        let name = PersonName::new(
            self.first_name
                .unwrap_or_else(|| current.name.first_name().to_owned()),
            self.last_name
                .unwrap_or_else(|| current.name.last_name().to_owned()),
        )?;
        Ok(UserProfile {
            username: self.username.unwrap_or_else(|| current.username.clone()),
            email: self.email.unwrap_or_else(|| current.email.clone()),
            name,
        })
    }
}

/// CRUD over accounts, ordered by join time descending.
#[async_trait]
pub trait UserController: Send + Sync {
    async fn list(&self, requester: &Requester) -> Result<Vec<User>, Error>;

    async fn retrieve(&self, requester: &Requester, id: &UserId) -> Result<User, Error>;

    async fn create(
        &self,
        requester: &Requester,
        registration: UserRegistration,
    ) -> Result<User, Error>;

    async fn update(
        &self,
        requester: &Requester,
        id: &UserId,
        changes: PendingChanges<UserChanges>,
        kind: UpdateKind,
    ) -> Result<User, Error>;

    async fn destroy(&self, requester: &Requester, id: &UserId) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn profile() -> UserProfile {
        UserProfile {
            username: Username::new("ada").expect("username"),
            email: EmailAddress::new("ada@example.com").expect("email"),
            name: PersonName::new("Ada", "Lovelace").expect("name"),
        }
    }

    #[rstest]
    fn empty_changes_keep_profile() {
        let current = profile();
        let merged = UserChanges::default().apply(&current).expect("merge");
        assert_eq!(merged, current);
    }

    #[rstest]
    fn supplied_fields_override() {
        let changes = UserChanges {
            email: Some(EmailAddress::new("countess@example.com").expect("email")),
            last_name: Some(String::new()),
            ..UserChanges::default()
        };
        let merged = changes.apply(&profile()).expect("merge");
        assert_eq!(merged.email.as_ref(), "countess@example.com");
        assert_eq!(merged.name.first_name(), "Ada");
        assert_eq!(merged.name.last_name(), "");
        assert_eq!(merged.username.as_ref(), "ada");
    }
}
