//! Per-action access rules for the resource controllers.
//!
//! Every controller resolves an [`ActionPolicy`] for the action it is about to
//! perform. The policy names the [`Permission`] guarding the action and the
//! payload shape the inbound adapter must decode. Collection-level checks run
//! before any repository access; object-level checks run once the target row
//! has been loaded.

use super::{BookingStatus, Error, UserId};

/// The caller of an operation, as resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    Authenticated { id: UserId, is_admin: bool },
}

impl Requester {
    /// Convenience constructor for a signed-in account.
    pub fn user(id: UserId, is_admin: bool) -> Self {
        Self::Authenticated { id, is_admin }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { is_admin: true, .. })
    }

    /// Account identifier when signed in.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(id),
        }
    }

    /// Account identifier, or `401` when anonymous.
    pub fn require_user_id(&self) -> Result<&UserId, Error> {
        self.user_id().ok_or_else(authentication_required)
    }
}

/// Operations a resource controller dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Read-only actions, which `IsAuthenticatedOrReadOnly` lets through.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// Whether an update replaces every writable field or only those supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Full,
    Partial,
}

impl UpdateKind {
    /// Controller action this update dispatches as.
    pub fn action(self) -> Action {
        match self {
            Self::Full => Action::Update,
            Self::Partial => Action::PartialUpdate,
        }
    }
}

/// Boolean access predicates evaluated per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Any signed-in account.
    IsAuthenticated,
    /// Reads for everyone, writes for signed-in accounts.
    IsAuthenticatedOrReadOnly,
    /// Anonymous callers or administrators.
    IsAdminOrAnonymous,
    /// Administrators, or the account the target row belongs to.
    IsAdminOrUserOwner,
}

impl Permission {
    /// Collection-level check, run before any lookup.
    pub fn has_permission(&self, requester: &Requester, action: Action) -> bool {
        match self {
            Self::IsAuthenticated | Self::IsAdminOrUserOwner => requester.is_authenticated(),
            Self::IsAuthenticatedOrReadOnly => action.is_safe() || requester.is_authenticated(),
            Self::IsAdminOrAnonymous => !requester.is_authenticated() || requester.is_admin(),
        }
    }

    /// Object-level check against the account owning the target row.
    pub fn has_object_permission(
        &self,
        requester: &Requester,
        action: Action,
        owner: &UserId,
    ) -> bool {
        match self {
            Self::IsAdminOrUserOwner => {
                requester.is_admin() || requester.user_id().is_some_and(|id| id == owner)
            }
            _ => self.has_permission(requester, action),
        }
    }
}

/// Payload shape a controller expects for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerShape {
    Standard,
    /// Account creation: credentials plus confirmation.
    Registration,
}

/// Permission and payload shape resolved for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPolicy {
    pub permission: Permission,
    pub shape: SerializerShape,
}

impl ActionPolicy {
    pub const fn standard(permission: Permission) -> Self {
        Self {
            permission,
            shape: SerializerShape::Standard,
        }
    }

    /// Run the collection-level check for `action`.
    pub fn authorize(&self, requester: &Requester, action: Action) -> Result<(), Error> {
        if self.permission.has_permission(requester, action) {
            Ok(())
        } else {
            Err(denial(requester))
        }
    }

    /// Run the object-level check for `action` against `owner`.
    pub fn authorize_object(
        &self,
        requester: &Requester,
        action: Action,
        owner: &UserId,
    ) -> Result<(), Error> {
        if self
            .permission
            .has_object_permission(requester, action, owner)
        {
            Ok(())
        } else {
            Err(denial(requester))
        }
    }
}

/// Action-to-policy table for one resource.
pub trait ResourcePolicy {
    fn for_action(action: Action) -> ActionPolicy;
}

/// Accounts: open registration, owner-or-admin mutation, authenticated reads.
pub struct UserPolicy;

impl ResourcePolicy for UserPolicy {
    fn for_action(action: Action) -> ActionPolicy {
        match action {
            Action::Create => ActionPolicy {
                permission: Permission::IsAdminOrAnonymous,
                shape: SerializerShape::Registration,
            },
            Action::Update | Action::PartialUpdate | Action::Destroy => {
                ActionPolicy::standard(Permission::IsAdminOrUserOwner)
            }
            Action::List | Action::Retrieve => ActionPolicy::standard(Permission::IsAuthenticated),
        }
    }
}

/// Listings: public reads, authenticated writes, no ownership check.
pub struct ListingPolicy;

impl ResourcePolicy for ListingPolicy {
    fn for_action(_action: Action) -> ActionPolicy {
        ActionPolicy::standard(Permission::IsAuthenticatedOrReadOnly)
    }
}

/// Bookings: reads follow the queryset, writes need an account.
pub struct BookingPolicy;

impl ResourcePolicy for BookingPolicy {
    fn for_action(_action: Action) -> ActionPolicy {
        ActionPolicy::standard(Permission::IsAuthenticatedOrReadOnly)
    }
}

/// Row filter applied to every booking query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub customer: Option<UserId>,
}

impl BookingFilter {
    /// Bookings the requester may see: confirmed ones, and only their own
    /// when signed in. Anonymous callers see every confirmed booking.
    pub fn visible_to(requester: &Requester) -> Self {
        Self {
            status: Some(BookingStatus::Confirmed),
            customer: requester.user_id().cloned(),
        }
    }

    /// In-process evaluation of the filter.
    pub fn matches(&self, status: BookingStatus, customer: &UserId) -> bool {
        self.status.is_none_or(|wanted| wanted == status)
            && self.customer.as_ref().is_none_or(|wanted| wanted == customer)
    }
}

/// `401` for anonymous callers, `403` for signed-in ones.
pub fn denial(requester: &Requester) -> Error {
    if requester.is_authenticated() {
        Error::forbidden("you do not have permission to perform this action")
    } else {
        authentication_required()
    }
}

fn authentication_required() -> Error {
    Error::unauthorized("authentication credentials were not provided")
}

#[cfg(test)]
mod tests;
