//! Requester resolution shared by the resource handlers.

use actix_web::web;

use crate::domain::{Error, Requester};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve who is calling from the session cookie.
pub(crate) async fn resolve(
    state: &web::Data<HttpState>,
    session: &SessionContext,
) -> Result<Requester, Error> {
    let user_id = session.user_id()?;
    state.login.requester(user_id.as_ref()).await
}
