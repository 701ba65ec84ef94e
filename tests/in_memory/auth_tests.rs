//! Handler tests for registration, login, guest login, and token handling.

use rstest::rstest;
use serde_json::json;

use crate::in_memory::helpers::{App, app, error_response};
use taskboard::api::auth;
use taskboard::api::payloads::LoginBody;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_returns_token_and_derived_fullname(app: App) {
    let session = app.register("ada lovelace", "ada@example.com").await;

    let body = serde_json::to_value(&session).expect("serialize");
    assert_eq!(body["fullname"], "Ada Lovelace");
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["token"].as_str().is_some_and(|token| !token.is_empty()));
    assert!(body["user_id"].as_str().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_registration_is_field_scoped(app: App) {
    app.register("ada lovelace", "ada@example.com").await;

    let body = serde_json::from_value(json!({
        "fullname": "Augusta King",
        "email": "ada@example.com",
        "password": "other",
        "repeated_password": "other",
    }))
    .expect("valid body");
    let err = auth::register(&app.identity, body)
        .await
        .expect_err("duplicate email");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "email": "Email already exists" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_token_fullname_is_rejected(app: App) {
    let body = serde_json::from_value(json!({
        "fullname": "Ada",
        "email": "ada@example.com",
        "password": "s3cret",
        "repeated_password": "s3cret",
    }))
    .expect("valid body");
    let err = auth::register(&app.identity, body)
        .await
        .expect_err("incomplete name");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert!(payload.get("fullname").is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn password_mismatch_is_field_scoped(app: App) {
    let body = serde_json::from_value(json!({
        "fullname": "ada lovelace",
        "email": "ada@example.com",
        "password": "one",
        "repeated_password": "two",
    }))
    .expect("valid body");
    let err = auth::register(&app.identity, body)
        .await
        .expect_err("mismatch");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "repeated_password": "Passwords don't match" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_reuses_the_registration_token(app: App) {
    let registered = app.register("ada lovelace", "ada@example.com").await;

    let body = LoginBody {
        email: "ada@example.com".to_owned(),
        password: "s3cret".to_owned(),
    };
    let session = auth::login(&app.identity, body).await.expect("login");
    assert_eq!(session.token, registered.token);
    assert_eq!(session.user_id, registered.user_id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_login_is_a_400_not_a_401(app: App) {
    app.register("ada lovelace", "ada@example.com").await;

    let body = LoginBody {
        email: "ada@example.com".to_owned(),
        password: "wrong".to_owned(),
    };
    let err = auth::login(&app.identity, body).await.expect_err("bad login");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "detail": "Invalid credentials" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_login_fields_name_the_requirement(app: App) {
    let body = LoginBody {
        email: String::new(),
        password: String::new(),
    };
    let err = auth::login(&app.identity, body).await.expect_err("blank login");

    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "detail": "Must provide email and password" }));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guest_login_generates_a_fresh_account_each_time(app: App) {
    let first = auth::guest_login(&app.identity).await.expect("guest login");
    let second = auth::guest_login(&app.identity).await.expect("guest login");

    assert_ne!(first.username, second.username);
    assert_ne!(first.token, second.token);
    for response in [&first, &second] {
        let suffix = response
            .username
            .strip_prefix("guest_")
            .expect("guest_ prefix");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn guest_token_authenticates_requests(app: App) {
    let guest = auth::guest_login(&app.identity).await.expect("guest login");

    let header = format!("Token {}", guest.token);
    let actor = auth::authenticate(&app.identity, Some(&header))
        .await
        .expect("authenticate");
    assert_eq!(actor, guest.user_id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_and_bogus_credentials_fail_authentication(app: App) {
    let err = auth::authenticate(&app.identity, None)
        .await
        .expect_err("no header");
    assert_eq!(err.status(), 400);

    let err = auth::authenticate(&app.identity, Some("Token bogus"))
        .await
        .expect_err("unknown token");
    let (status, payload) = error_response(&err);
    assert_eq!(status, 400);
    assert_eq!(payload, json!({ "detail": "Invalid token." }));

    let err = auth::authenticate(&app.identity, Some("Bearer abc"))
        .await
        .expect_err("wrong scheme");
    assert_eq!(err.status(), 400);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn email_check_reports_matches_and_misses(app: App) {
    let session = app.register("ada lovelace", "ada@example.com").await;

    let found = auth::email_check(&app.identity, Some("ada@example.com"))
        .await
        .expect("check");
    assert_eq!(found.id, session.user_id);
    assert_eq!(found.fullname, "Ada Lovelace");

    let err = auth::email_check(&app.identity, Some("other@example.com"))
        .await
        .expect_err("unknown email");
    assert_eq!(err.status(), 404);

    let err = auth::email_check(&app.identity, None)
        .await
        .expect_err("missing param");
    assert_eq!(err.status(), 400);
}
