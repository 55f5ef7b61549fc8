//! Booking resource handlers.
//!
//! Every read and per-id write is resolved through the caller's queryset:
//! confirmed bookings, narrowed to their own when signed in. The customer is
//! always the signed-in account; a `customer` key in the body is ignored.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{BookingChanges, BookingRequest, PendingChanges};
use crate::domain::{
    Action, Booking, BookingId, BookingPolicy, BookingStatus, Error, ListingId, ResourcePolicy,
    UpdateKind,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::resolve;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_choice_error, missing_field_error, parse_date, parse_uuid, require,
};

const STATUS_CHOICES: &str = "pending, confirmed, canceled";

/// Booking representation returned by every booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub listing_id: Uuid,
    /// Account that made the booking. Read-only.
    pub customer: Uuid,
    #[schema(example = "2025-09-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-09-04")]
    pub end_date: NaiveDate,
    #[schema(example = "confirmed")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        let stay = booking.stay();
        Self {
            id: *booking.id().as_uuid(),
            listing_id: *booking.listing_id().as_uuid(),
            customer: *booking.customer().as_uuid(),
            start_date: stay.start(),
            end_date: stay.end(),
            status: booking.status().as_str().to_owned(),
            created_at: booking.created_at(),
        }
    }
}

/// Writable booking fields.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub listing_id: Option<String>,
    #[schema(example = "2025-09-01")]
    pub start_date: Option<String>,
    #[schema(example = "2025-09-04")]
    pub end_date: Option<String>,
    /// Defaults to `confirmed` on create.
    #[schema(example = "confirmed")]
    pub status: Option<String>,
}

fn parse_status(raw: &str) -> Result<BookingStatus, Error> {
    raw.parse()
        .map_err(|_| invalid_choice_error("status", raw, STATUS_CHOICES))
}

fn parse_listing_id(raw: &str) -> Result<ListingId, Error> {
    parse_uuid(raw, "listingId").map(ListingId::from_uuid)
}

impl BookingRequestBody {
    pub(crate) fn into_request(self) -> Result<BookingRequest, Error> {
        let listing_id = parse_listing_id(&require(self.listing_id, "listingId")?)?;
        let start_date = parse_date(&require(self.start_date, "startDate")?, "startDate")?;
        let end_date = parse_date(&require(self.end_date, "endDate")?, "endDate")?;
        let status = self.status.as_deref().map(parse_status).transpose()?;
        Ok(BookingRequest {
            listing_id,
            start_date,
            end_date,
            status,
        })
    }

    pub(crate) fn into_changes(self, kind: UpdateKind) -> Result<BookingChanges, Error> {
        if kind == UpdateKind::Full {
            let supplied = [
                (self.listing_id.is_some(), "listingId"),
                (self.start_date.is_some(), "startDate"),
                (self.end_date.is_some(), "endDate"),
            ];
            if let Some((_, field)) = supplied.into_iter().find(|(present, _)| !present) {
                return Err(missing_field_error(field));
            }
        }
        Ok(BookingChanges {
            listing_id: self.listing_id.as_deref().map(parse_listing_id).transpose()?,
            start_date: self
                .start_date
                .as_deref()
                .map(|raw| parse_date(raw, "startDate"))
                .transpose()?,
            end_date: self
                .end_date
                .as_deref()
                .map(|raw| parse_date(raw, "endDate"))
                .transpose()?,
            status: self.status.as_deref().map(parse_status).transpose()?,
        })
    }
}

/// List the bookings visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "Visible bookings", body = [BookingResponse]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookings",
    security([], ("SessionCookie" = []))
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BookingResponse>>> {
    let requester = resolve(&state, &session).await?;
    let bookings = state.bookings.list(&requester).await?;
    Ok(web::Json(bookings.iter().map(BookingResponse::from).collect()))
}

/// Book a listing as the signed-in account.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = BookingRequestBody,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid payload or unknown listing", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<BookingRequestBody>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    BookingPolicy::for_action(Action::Create).authorize(&requester, Action::Create)?;
    let request = payload.into_inner().into_request()?;
    let booking = state.bookings.create(&requester, request).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(&booking)))
}

/// Fetch one booking from the caller's queryset.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 404, description = "Unknown or not visible", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking",
    security([], ("SessionCookie" = []))
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<BookingResponse>> {
    let requester = resolve(&state, &session).await?;
    let booking = state
        .bookings
        .retrieve(&requester, &BookingId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(BookingResponse::from(&booking)))
}

async fn apply_update(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: Uuid,
    body: BookingRequestBody,
    kind: UpdateKind,
) -> ApiResult<web::Json<BookingResponse>> {
    let requester = resolve(&state, &session).await?;
    let changes = PendingChanges::new(move |update| body.into_changes(update));
    let booking = state
        .bookings
        .update(&requester, &BookingId::from_uuid(id), changes, kind)
        .await?;
    Ok(web::Json(BookingResponse::from(&booking)))
}

/// Replace a booking's writable fields.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    request_body = BookingRequestBody,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "Invalid or incomplete payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown or not visible", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "replaceBooking"
)]
#[put("/bookings/{id}")]
pub async fn replace_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<BookingRequestBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Full,
    )
    .await
}

/// Change some of a booking's writable fields.
#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    request_body = BookingRequestBody,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown or not visible", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[patch("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<BookingRequestBody>,
) -> ApiResult<web::Json<BookingResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Partial,
    )
    .await
}

/// Delete a booking from the caller's queryset.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking identifier")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown or not visible", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/bookings/{id}")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    state
        .bookings
        .destroy(&requester, &BookingId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
