//! Account endpoints exercised end to end over the in-memory store.

mod support;

use actix_web::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};

use support::{PASSWORD, call, init_app, login, register, sign_up};
use travel_backend::test_support::{in_memory_state, seed_admin};

#[rstest]
#[actix_web::test]
async fn anonymous_registration_creates_an_account() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;

    let user = register(&app, "ada").await;
    assert_eq!(user["username"], "ada");
    assert_eq!(user["isAdmin"], false);
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
}

#[rstest]
#[actix_web::test]
async fn signed_in_member_cannot_register_another_account() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (_, session) = sign_up(&app, "ada").await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "sock-puppet",
            "email": "puppet@example.com",
            "password": PASSWORD,
            "passwordConfirmation": PASSWORD,
        })),
        Some(&session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn admin_may_register_accounts() {
    let (state, store) = in_memory_state();
    let app = init_app(state).await;
    seed_admin(&store, "root", PASSWORD).await;
    let session = login(&app, "root", PASSWORD).await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "grace",
            "email": "grace@example.com",
            "password": PASSWORD,
            "passwordConfirmation": PASSWORD,
        })),
        Some(&session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn mismatched_confirmation_is_a_field_error() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": PASSWORD,
            "passwordConfirmation": "something-else",
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), Some("invalid_request"));
    assert_eq!(reply.error_field(), Some("passwordConfirmation"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_username_is_a_field_error() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    register(&app, "ada").await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "username": "ada",
            "email": "other@example.com",
            "password": PASSWORD,
            "passwordConfirmation": PASSWORD,
        })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_field(), Some("username"));
}

#[rstest]
#[actix_web::test]
async fn listing_users_requires_a_session_and_is_newest_first() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    register(&app, "first").await;
    register(&app, "second").await;
    let (_, session) = sign_up(&app, "third").await;

    let anonymous = call(&app, Method::GET, "/api/v1/users", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert!(anonymous.trace_id.is_some());

    let reply = call(&app, Method::GET, "/api/v1/users", None, Some(&session)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let names: Vec<&str> = reply
        .body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(names, ["third", "second", "first"]);
}

#[rstest]
#[actix_web::test]
async fn owner_may_patch_but_others_may_not() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (ada_id, ada) = sign_up(&app, "ada").await;
    let (_, grace) = sign_up(&app, "grace").await;
    let uri = format!("/api/v1/users/{ada_id}");

    let denied = call(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "lastName": "Hopper" })),
        Some(&grace),
    )
    .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let updated = call(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "lastName": "Lovelace", "isAdmin": true })),
        Some(&ada),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["lastName"], "Lovelace");
    assert_eq!(updated.body["isAdmin"], false);
}

#[rstest]
#[actix_web::test]
async fn non_owner_is_forbidden_even_with_an_invalid_body() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (ada_id, _) = sign_up(&app, "ada").await;
    let (_, grace) = sign_up(&app, "grace").await;

    let reply = call(
        &app,
        Method::PATCH,
        &format!("/api/v1/users/{ada_id}"),
        Some(json!({ "email": "not-an-email" })),
        Some(&grace),
    )
    .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.error_code(), Some("forbidden"));
}

#[rstest]
#[actix_web::test]
async fn incomplete_put_to_unknown_account_is_not_found() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (_, session) = sign_up(&app, "ada").await;

    let reply = call(
        &app,
        Method::PUT,
        "/api/v1/users/00000000-0000-0000-0000-000000000000",
        Some(json!({ "lastName": "x" })),
        Some(&session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn put_requires_every_standard_field() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (id, session) = sign_up(&app, "ada").await;

    let reply = call(
        &app,
        Method::PUT,
        &format!("/api/v1/users/{id}"),
        Some(json!({ "username": "ada", "email": "ada@example.com" })),
        Some(&session),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_field(), Some("firstName"));
}

#[rstest]
#[actix_web::test]
async fn admin_may_delete_any_account() {
    let (state, store) = in_memory_state();
    let app = init_app(state).await;
    let (ada_id, _) = sign_up(&app, "ada").await;
    seed_admin(&store, "root", PASSWORD).await;
    let root = login(&app, "root", PASSWORD).await;
    let uri = format!("/api/v1/users/{ada_id}");

    let deleted = call(&app, Method::DELETE, &uri, None, Some(&root)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);

    let gone = call(&app, Method::GET, &uri, None, Some(&root)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/v1/users/not-a-uuid")]
#[case("/api/v1/users/00000000-0000-0000-0000-000000000000")]
#[actix_web::test]
async fn unknown_or_malformed_ids_are_not_found(#[case] uri: &str) {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (_, session) = sign_up(&app, "ada").await;

    let reply = call(&app, Method::GET, uri, None, Some(&session)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), Some("not_found"));
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    register(&app, "ada").await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/login",
        Some(json!({ "username": "ada", "password": "not-the-password" })),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (_, session) = sign_up(&app, "ada").await;

    let reply = call(&app, Method::POST, "/api/v1/logout", None, Some(&session)).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    let cleared = reply.session.expect("removal cookie");
    assert_eq!(cleared.value(), "");

    let after = call(&app, Method::GET, "/api/v1/users", None, Some(&cleared)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn deleted_account_session_is_anonymous() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;
    let (id, session) = sign_up(&app, "ada").await;

    let deleted = call(
        &app,
        Method::DELETE,
        &format!("/api/v1/users/{id}"),
        None,
        Some(&session),
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let after = call(&app, Method::GET, "/api/v1/users", None, Some(&session)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_envelope() {
    let (state, _) = in_memory_state();
    let app = init_app(state).await;

    let request = actix_web::test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_web::test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_web::test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}
