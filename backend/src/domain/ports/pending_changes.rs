//! Update bodies decoded only once the target row has been authorised.

use crate::domain::{Error, UpdateKind};

type Decoder<C> = Box<dyn FnOnce(UpdateKind) -> Result<C, Error> + Send>;

/// Update payload whose validation waits for the lookup and object check.
///
/// A caller who may not touch the row, or names a row that does not exist,
/// learns that before anything about their payload.
pub struct PendingChanges<C>(Decoder<C>);

impl<C> PendingChanges<C> {
    pub fn new(decode: impl FnOnce(UpdateKind) -> Result<C, Error> + Send + 'static) -> Self {
        Self(Box::new(decode))
    }

    /// Changes that are already decoded.
    pub fn ready(changes: C) -> Self
    where
        C: Send + 'static,
    {
        Self::new(move |_| Ok(changes))
    }

    pub fn decode(self, kind: UpdateKind) -> Result<C, Error> {
        (self.0)(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn ready_ignores_update_kind() {
        assert_eq!(PendingChanges::ready(7_u8).decode(UpdateKind::Full).ok(), Some(7));
    }

    #[rstest]
    fn decoder_sees_update_kind() {
        let pending = PendingChanges::new(|kind| match kind {
            UpdateKind::Full => Err(Error::invalid_request("incomplete")),
            UpdateKind::Partial => Ok(()),
        });
        let err = pending.decode(UpdateKind::Full).expect_err("full rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
