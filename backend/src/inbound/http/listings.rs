//! Listing resource handlers.
//!
//! Reads are public. Writes need a session but no ownership; the host is
//! fixed to the creating account.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::ports::{ListingChanges, PendingChanges};
use crate::domain::{
    Action, Error, FieldViolation, Listing, ListingDetails, ListingId, ListingPolicy, Price,
    ResourcePolicy, UpdateKind,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::requester::resolve;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{invalid_decimal_error, missing_field_error, require};

const PRICE_FIELD: &str = "pricePerNight";

/// Listing representation returned by every listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub host_id: Uuid,
    #[schema(example = "Harbour loft")]
    pub title: String,
    pub description: String,
    #[schema(example = "Lisbon")]
    pub location: String,
    /// Decimal amount with two fractional digits.
    #[schema(example = "120.00")]
    pub price_per_night: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        let details = listing.details();
        Self {
            id: *listing.id().as_uuid(),
            host_id: *listing.host_id().as_uuid(),
            title: details.title().to_owned(),
            description: details.description().to_owned(),
            location: details.location().to_owned(),
            price_per_night: details.price_per_night().to_string(),
            created_at: listing.created_at(),
            updated_at: listing.updated_at(),
        }
    }
}

/// Writable listing fields. `hostId` is never read from the body.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Decimal string such as `"120.00"`; JSON numbers are accepted too.
    #[schema(value_type = Option<String>, example = "120.00")]
    pub price_per_night: Option<Value>,
}

fn parse_price(raw: &Value) -> Result<Price, Error> {
    let text = match raw {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => return Err(invalid_decimal_error(PRICE_FIELD, &other.to_string())),
    };
    text.parse::<Price>().map_err(FieldViolation::into_error)
}

impl ListingRequest {
    pub(crate) fn into_details(self) -> Result<ListingDetails, Error> {
        let title = require(self.title, "title")?;
        let location = require(self.location, "location")?;
        let price = parse_price(&require(self.price_per_night, PRICE_FIELD)?)?;
        ListingDetails::new(title, self.description.unwrap_or_default(), location, price)
            .map_err(FieldViolation::into_error)
    }

    pub(crate) fn into_changes(self, kind: UpdateKind) -> Result<ListingChanges, Error> {
        if kind == UpdateKind::Full {
            let supplied = [
                (self.title.is_some(), "title"),
                (self.location.is_some(), "location"),
                (self.price_per_night.is_some(), PRICE_FIELD),
            ];
            if let Some((_, field)) = supplied.into_iter().find(|(present, _)| !present) {
                return Err(missing_field_error(field));
            }
        }
        let price_per_night = self.price_per_night.as_ref().map(parse_price).transpose()?;
        let description = match kind {
            UpdateKind::Full => Some(self.description.unwrap_or_default()),
            UpdateKind::Partial => self.description,
        };
        Ok(ListingChanges {
            title: self.title,
            description,
            location: self.location,
            price_per_night,
        })
    }
}

/// List every listing, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/listings",
    responses(
        (status = 200, description = "Listings", body = [ListingResponse]),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "listListings",
    security([])
)]
#[get("/listings")]
pub async fn list_listings(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ListingResponse>>> {
    let requester = resolve(&state, &session).await?;
    let listings = state.listings.list(&requester).await?;
    Ok(web::Json(listings.iter().map(ListingResponse::from).collect()))
}

/// Create a listing hosted by the signed-in account.
#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "createListing"
)]
#[post("/listings")]
pub async fn create_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ListingRequest>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    ListingPolicy::for_action(Action::Create).authorize(&requester, Action::Create)?;
    let details = payload.into_inner().into_details()?;
    let listing = state.listings.create(&requester, details).await?;
    Ok(HttpResponse::Created().json(ListingResponse::from(&listing)))
}

/// Fetch one listing.
#[utoipa::path(
    get,
    path = "/api/v1/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing identifier")),
    responses(
        (status = 200, description = "Listing", body = ListingResponse),
        (status = 404, description = "Unknown listing", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "getListing",
    security([])
)]
#[get("/listings/{id}")]
pub async fn get_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<ListingResponse>> {
    let requester = resolve(&state, &session).await?;
    let listing = state
        .listings
        .retrieve(&requester, &ListingId::from_uuid(path.into_inner()))
        .await?;
    Ok(web::Json(ListingResponse::from(&listing)))
}

async fn apply_update(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: Uuid,
    request: ListingRequest,
    kind: UpdateKind,
) -> ApiResult<web::Json<ListingResponse>> {
    let requester = resolve(&state, &session).await?;
    let changes = PendingChanges::new(move |update| request.into_changes(update));
    let listing = state
        .listings
        .update(&requester, &ListingId::from_uuid(id), changes, kind)
        .await?;
    Ok(web::Json(ListingResponse::from(&listing)))
}

/// Replace a listing's writable fields.
#[utoipa::path(
    put,
    path = "/api/v1/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing identifier")),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ListingResponse),
        (status = 400, description = "Invalid or incomplete payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "replaceListing"
)]
#[put("/listings/{id}")]
pub async fn replace_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ListingRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Full,
    )
    .await
}

/// Change some of a listing's writable fields.
#[utoipa::path(
    patch,
    path = "/api/v1/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing identifier")),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ListingResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "updateListing"
)]
#[patch("/listings/{id}")]
pub async fn update_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<ListingRequest>,
) -> ApiResult<web::Json<ListingResponse>> {
    apply_update(
        state,
        session,
        path.into_inner(),
        payload.into_inner(),
        UpdateKind::Partial,
    )
    .await
}

/// Delete a listing and its bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/listings/{id}",
    params(("id" = Uuid, Path, description = "Listing identifier")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown listing", body = ErrorSchema)
    ),
    tags = ["listings"],
    operation_id = "deleteListing"
)]
#[delete("/listings/{id}")]
pub async fn delete_listing(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let requester = resolve(&state, &session).await?;
    state
        .listings
        .destroy(&requester, &ListingId::from_uuid(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
