//! Tests for permission predicates and per-resource policy tables.

use super::*;
use crate::domain::ErrorCode;
use rstest::{fixture, rstest};

#[fixture]
fn member() -> Requester {
    Requester::user(UserId::random(), false)
}

#[fixture]
fn admin() -> Requester {
    Requester::user(UserId::random(), true)
}

const ALL_ACTIONS: [Action; 6] = [
    Action::List,
    Action::Retrieve,
    Action::Create,
    Action::Update,
    Action::PartialUpdate,
    Action::Destroy,
];

#[rstest]
#[case(Action::List, true)]
#[case(Action::Retrieve, true)]
#[case(Action::Create, false)]
#[case(Action::Update, false)]
#[case(Action::PartialUpdate, false)]
#[case(Action::Destroy, false)]
fn read_only_lets_anonymous_read(#[case] action: Action, #[case] allowed: bool) {
    let permission = Permission::IsAuthenticatedOrReadOnly;
    assert_eq!(
        permission.has_permission(&Requester::Anonymous, action),
        allowed
    );
}

#[rstest]
fn read_only_lets_members_write(member: Requester) {
    for action in ALL_ACTIONS {
        assert!(Permission::IsAuthenticatedOrReadOnly.has_permission(&member, action));
    }
}

#[rstest]
fn admin_or_anonymous_rejects_plain_members(member: Requester, admin: Requester) {
    let permission = Permission::IsAdminOrAnonymous;
    assert!(permission.has_permission(&Requester::Anonymous, Action::Create));
    assert!(permission.has_permission(&admin, Action::Create));
    assert!(!permission.has_permission(&member, Action::Create));
}

#[rstest]
fn admin_or_owner_checks_the_target(member: Requester, admin: Requester) {
    let permission = Permission::IsAdminOrUserOwner;
    let own_id = member.user_id().cloned().expect("member has id");
    let other = UserId::random();

    assert!(permission.has_object_permission(&member, Action::Update, &own_id));
    assert!(!permission.has_object_permission(&member, Action::Update, &other));
    assert!(permission.has_object_permission(&admin, Action::Destroy, &other));
    assert!(!permission.has_permission(&Requester::Anonymous, Action::Destroy));
    assert!(!permission.has_object_permission(&Requester::Anonymous, Action::Destroy, &other));
}

#[rstest]
#[case(Action::Create, Permission::IsAdminOrAnonymous, SerializerShape::Registration)]
#[case(Action::Update, Permission::IsAdminOrUserOwner, SerializerShape::Standard)]
#[case(Action::PartialUpdate, Permission::IsAdminOrUserOwner, SerializerShape::Standard)]
#[case(Action::Destroy, Permission::IsAdminOrUserOwner, SerializerShape::Standard)]
#[case(Action::List, Permission::IsAuthenticated, SerializerShape::Standard)]
#[case(Action::Retrieve, Permission::IsAuthenticated, SerializerShape::Standard)]
fn user_policy_table(
    #[case] action: Action,
    #[case] permission: Permission,
    #[case] shape: SerializerShape,
) {
    assert_eq!(
        UserPolicy::for_action(action),
        ActionPolicy { permission, shape }
    );
}

#[rstest]
fn listing_and_booking_policies_are_read_only_for_anonymous() {
    for action in ALL_ACTIONS {
        let expected = ActionPolicy::standard(Permission::IsAuthenticatedOrReadOnly);
        assert_eq!(ListingPolicy::for_action(action), expected);
        assert_eq!(BookingPolicy::for_action(action), expected);
    }
}

#[rstest]
fn denial_distinguishes_anonymous_from_members(member: Requester) {
    let policy = ActionPolicy::standard(Permission::IsAuthenticated);
    let anonymous = policy
        .authorize(&Requester::Anonymous, Action::List)
        .expect_err("anonymous denied");
    assert_eq!(anonymous.code(), ErrorCode::Unauthorized);

    let owner_policy = UserPolicy::for_action(Action::Destroy);
    let forbidden = owner_policy
        .authorize_object(&member, Action::Destroy, &UserId::random())
        .expect_err("non-owner denied");
    assert_eq!(forbidden.code(), ErrorCode::Forbidden);
}

#[rstest]
fn booking_filter_narrows_to_requester(member: Requester) {
    let filter = BookingFilter::visible_to(&member);
    let own_id = member.user_id().cloned().expect("member has id");
    assert_eq!(filter.status, Some(BookingStatus::Confirmed));
    assert_eq!(filter.customer.as_ref(), Some(&own_id));

    assert!(filter.matches(BookingStatus::Confirmed, &own_id));
    assert!(!filter.matches(BookingStatus::Pending, &own_id));
    assert!(!filter.matches(BookingStatus::Confirmed, &UserId::random()));
}

#[rstest]
fn booking_filter_for_anonymous_keeps_all_confirmed() {
    let filter = BookingFilter::visible_to(&Requester::Anonymous);
    assert!(filter.customer.is_none());
    assert!(filter.matches(BookingStatus::Confirmed, &UserId::random()));
    assert!(!filter.matches(BookingStatus::Canceled, &UserId::random()));
}
