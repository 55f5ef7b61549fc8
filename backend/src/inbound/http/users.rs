//! Account resource handlers.
//!
//! ```text
//! POST   /api/v1/users {"username":"ada","email":"ada@example.com","password":"…","passwordConfirmation":"…"}
//! GET    /api/v1/users
//! GET    /api/v1/users/{id}
//! PUT    /api/v1/users/{id} {"username":"ada","email":"ada@example.com","firstName":"Ada","lastName":"Lovelace"}
//! PATCH  /api/v1/users/{id} {"lastName":"King"}
//! DELETE /api/v1/users/{id}
//! ```
//!
//! The request body is decoded according to the [`SerializerShape`] the
//! user policy selects for the action, so registration fields are only ever
//! read on `POST`.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{PendingChanges, UserChanges, UserRegistration};
use crate::domain::{
    Action, EmailAddress, Error, FieldViolation, NewPassword, PersonName, Requester,
    ResourcePolicy, SerializerShape, UpdateKind, User, UserId, UserPolicy, UserProfile, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::resolve;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, require};

/// Account representation returned by every user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            is_admin: user.is_admin(),
            date_joined: user.date_joined(),
        }
    }
}

/// Standard account shape used by updates.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserRequest {
    /// Convert into profile changes. A full update needs every field.
    pub(crate) fn into_changes(self, kind: UpdateKind) -> Result<UserChanges, Error> {
        if kind == UpdateKind::Full {
            let supplied = [
                (self.username.is_some(), "username"),
                (self.email.is_some(), "email"),
                (self.first_name.is_some(), "firstName"),
                (self.last_name.is_some(), "lastName"),
            ];
            if let Some((_, field)) = supplied.into_iter().find(|(present, _)| !present) {
                return Err(missing_field_error(field));
            }
        }

        let username = self
            .username
            .map(Username::new)
            .transpose()
            .map_err(FieldViolation::into_error)?;
        let email = self
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(FieldViolation::into_error)?;
        Ok(UserChanges {
            username,
            email,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Registration shape used by `POST /api/v1/users`.
#[derive(Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RegistrationRequest {
    pub(crate) fn into_registration(self) -> Result<UserRegistration, Error> {
        let username = Username::new(require(self.username, "username")?)
            .map_err(FieldViolation::into_error)?;
        let email =
            EmailAddress::new(require(self.email, "email")?).map_err(FieldViolation::into_error)?;
        let name = PersonName::new(
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default(),
        )
        .map_err(FieldViolation::into_error)?;
        let password = Zeroizing::new(require(self.password, "password")?);
        let confirmation =
            Zeroizing::new(require(self.password_confirmation, "passwordConfirmation")?);
        let password =
            NewPassword::confirm(&password, &confirmation).map_err(FieldViolation::into_error)?;

        Ok(UserRegistration {
            profile: UserProfile {
                username,
                email,
                name,
            },
            password,
        })
    }
}

/// Request body decoded for one action.
pub(crate) enum UserPayload {
    Registration(RegistrationRequest),
    Standard(UserRequest),
}

impl UserPayload {
    pub(crate) fn decode(shape: SerializerShape, body: Value) -> Result<Self, Error> {
        match shape {
            SerializerShape::Registration => decode_body(body).map(Self::Registration),
            SerializerShape::Standard => decode_body(body).map(Self::Standard),
        }
    }

    /// Run the collection-level check for `action`, then decode its shape.
    fn for_action(requester: &Requester, action: Action, body: Value) -> Result<Self, Error> {
        let policy = UserPolicy::for_action(action);
        policy.authorize(requester, action)?;
        Self::decode(policy.shape, body)
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Error> {
    serde_json::from_value(body)
        .map_err(|err| Error::invalid_request(format!("invalid request body: {err}")))
}

fn unexpected_shape(action: Action) -> Error {
    Error::internal(format!("no user payload shape wired for {action:?}"))
}

/// List accounts, most recently joined first.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let requester = resolve(&state, &session).await?;
    let users = state.users.list(&requester).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

/// Register an account. Open to anonymous callers and administrators.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid registration", body = ErrorSchema),
        (status = 403, description = "Signed in without admin rights", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([], ("SessionCookie" = []))
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    let body = payload.into_inner();
    let registration = match UserPayload::for_action(&requester, Action::Create, body)? {
        UserPayload::Registration(request) => request.into_registration()?,
        UserPayload::Standard(_) => return Err(unexpected_shape(Action::Create)),
    };
    let user = state.users.create(&requester, registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Fetch one account.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserResponse>> {
    let requester = resolve(&state, &session).await?;
    let id = UserId::from_uuid(path.into_inner());
    let user = state.users.retrieve(&requester, &id).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

async fn apply_update(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: Uuid,
    body: Value,
    kind: UpdateKind,
) -> ApiResult<web::Json<UserResponse>> {
    let requester = resolve(&state, &session).await?;
    let changes = PendingChanges::new(move |update: UpdateKind| {
        let shape = UserPolicy::for_action(update.action()).shape;
        match UserPayload::decode(shape, body)? {
            UserPayload::Standard(request) => request.into_changes(update),
            UserPayload::Registration(_) => Err(unexpected_shape(update.action())),
        }
    });
    let user = state
        .users
        .update(&requester, &UserId::from_uuid(id), changes, kind)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Replace every editable field of an account.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid or incomplete payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Neither the owner nor an admin", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<UserResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Full,
    )
    .await
}

/// Change some editable fields of an account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Neither the owner nor an admin", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> ApiResult<web::Json<UserResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Partial,
    )
    .await
}

/// Delete an account together with its listings and bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "Account identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Neither the owner nor an admin", body = ErrorSchema),
        (status = 404, description = "Unknown account", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    state
        .users
        .destroy(&requester, &UserId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
