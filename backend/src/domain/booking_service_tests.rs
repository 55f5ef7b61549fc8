//! Tests for the booking resource controller.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockBookingRepository, MockListingRepository};
use crate::domain::{
    BookingStatus, BookingTerms, ErrorCode, Listing, ListingDetails, Price, Stay, UserId,
};
use crate::test_support::MutableClock;
use chrono::{DateTime, NaiveDate, Utc};
use rstest::rstest;

type Service = BookingService<MockBookingRepository, MockListingRepository>;

fn make_service(bookings: MockBookingRepository, listings: MockListingRepository) -> Service {
    BookingService::new(
        Arc::new(bookings),
        Arc::new(listings),
        Arc::new(MutableClock::fixed_start()),
    )
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).expect("valid date")
}

fn listing(id: ListingId) -> Listing {
    let created = DateTime::<Utc>::from_timestamp(1_600_000_000, 0).expect("timestamp");
    let price = Price::from_minor_units(9_000).expect("price");
    Listing::new(
        id,
        UserId::random(),
        ListingDetails::new("Cabin", "", "Oslo", price).expect("details"),
        created,
        created,
    )
}

fn stored_booking(customer: &UserId) -> Booking {
    let created = DateTime::<Utc>::from_timestamp(1_650_000_000, 0).expect("timestamp");
    Booking::new(
        BookingId::random(),
        customer.clone(),
        BookingTerms {
            listing_id: ListingId::random(),
            stay: Stay::new(date(1), date(4)).expect("stay"),
            status: BookingStatus::Confirmed,
        },
        created,
    )
}

fn request(listing_id: ListingId) -> BookingRequest {
    BookingRequest {
        listing_id,
        start_date: date(10),
        end_date: date(12),
        status: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_assigns_requester_as_customer() {
    let customer = UserId::random();
    let expected = customer.clone();
    let listing_id = ListingId::random();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .return_once(move |id| Ok(Some(listing(*id))));
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_insert()
        .withf(move |booking| booking.customer() == &expected)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(bookings, listings);
    let booking = service
        .create(&Requester::user(customer.clone(), false), request(listing_id))
        .await
        .expect("create succeeds");

    assert_eq!(booking.customer(), &customer);
    assert_eq!(booking.status(), BookingStatus::Confirmed);
    assert_eq!(booking.listing_id(), listing_id);
}

#[rstest]
#[tokio::test]
async fn anonymous_create_is_unauthorized() {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_insert().never();
    let service = make_service(bookings, MockListingRepository::new());

    let err = service
        .create(&Requester::Anonymous, request(ListingId::random()))
        .await
        .expect_err("anonymous rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_rejects_unknown_listing() {
    let mut listings = MockListingRepository::new();
    listings.expect_find_by_id().return_once(|_| Ok(None));
    let mut bookings = MockBookingRepository::new();
    bookings.expect_insert().never();

    let service = make_service(bookings, listings);
    let err = service
        .create(
            &Requester::user(UserId::random(), false),
            request(ListingId::random()),
        )
        .await
        .expect_err("unknown listing rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().expect("details")["field"], "listingId");
}

#[rstest]
#[tokio::test]
async fn create_rejects_inverted_stay() {
    let service = make_service(MockBookingRepository::new(), MockListingRepository::new());
    let mut inverted = request(ListingId::random());
    inverted.end_date = inverted.start_date;

    let err = service
        .create(&Requester::user(UserId::random(), false), inverted)
        .await
        .expect_err("inverted stay rejected");
    assert_eq!(err.details().expect("details")["field"], "endDate");
}

#[rstest]
#[tokio::test]
async fn list_filters_by_requester() {
    let customer = UserId::random();
    let expected = BookingFilter {
        status: Some(BookingStatus::Confirmed),
        customer: Some(customer.clone()),
    };
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list()
        .withf(move |filter| filter == &expected)
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(bookings, MockListingRepository::new());
    service
        .list(&Requester::user(customer, false))
        .await
        .expect("list succeeds");
}

#[rstest]
#[tokio::test]
async fn anonymous_list_sees_all_confirmed() {
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_list()
        .withf(|filter| {
            filter.customer.is_none() && filter.status == Some(BookingStatus::Confirmed)
        })
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = make_service(bookings, MockListingRepository::new());
    service
        .list(&Requester::Anonymous)
        .await
        .expect("anonymous list succeeds");
}

#[rstest]
#[tokio::test]
async fn booking_outside_queryset_is_not_found() {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find().return_once(|_, _| Ok(None));
    bookings.expect_delete().never();

    let service = make_service(bookings, MockListingRepository::new());
    let err = service
        .destroy(
            &Requester::user(UserId::random(), false),
            &BookingId::random(),
        )
        .await
        .expect_err("hidden booking");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_keeps_customer_and_changes_status() {
    let customer = UserId::random();
    let booking = stored_booking(&customer);
    let id = booking.id();
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find()
        .return_once(move |_, _| Ok(Some(booking)));
    bookings
        .expect_update()
        .withf(|booking| booking.status() == BookingStatus::Canceled)
        .times(1)
        .return_once(|_| Ok(true));
    let mut listings = MockListingRepository::new();
    listings.expect_find_by_id().never();

    let service = make_service(bookings, listings);
    let changes = BookingChanges {
        status: Some(BookingStatus::Canceled),
        ..BookingChanges::default()
    };
    let updated = service
        .update(
            &Requester::user(customer.clone(), false),
            &id,
            PendingChanges::ready(changes),
            UpdateKind::Partial,
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.customer(), &customer);
    assert_eq!(updated.stay().nights(), 3);
}

#[rstest]
#[tokio::test]
async fn update_revalidates_new_listing() {
    let customer = UserId::random();
    let booking = stored_booking(&customer);
    let id = booking.id();
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find()
        .return_once(move |_, _| Ok(Some(booking)));
    bookings.expect_update().never();
    let mut listings = MockListingRepository::new();
    listings.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(bookings, listings);
    let changes = BookingChanges {
        listing_id: Some(ListingId::random()),
        ..BookingChanges::default()
    };
    let err = service
        .update(
            &Requester::user(customer, false),
            &id,
            PendingChanges::ready(changes),
            UpdateKind::Partial,
        )
        .await
        .expect_err("unknown listing rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn anonymous_update_is_unauthorized_before_lookup() {
    let mut bookings = MockBookingRepository::new();
    bookings.expect_find().never();

    let service = make_service(bookings, MockListingRepository::new());
    let err = service
        .update(
            &Requester::Anonymous,
            &BookingId::random(),
            PendingChanges::ready(BookingChanges::default()),
            UpdateKind::Full,
        )
        .await
        .expect_err("anonymous rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}
