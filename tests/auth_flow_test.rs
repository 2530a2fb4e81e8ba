//! Integration tests for the authentication flow.
//!
//! Requires PostgreSQL; run with
//! `AUTHHUB_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use common::TestApp;
use http::StatusCode;

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_register_login_refresh_logout_lifecycle() {
    let app = TestApp::new().await;

    // Register: 201, account inactive, pending role.
    let register = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "alice@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(register.status, StatusCode::CREATED);
    assert_eq!(register.json_path(&["data", "user", "active"]), false);
    assert_eq!(
        register.json_path(&["data", "user", "roles"]),
        &serde_json::json!(["pending"])
    );
    // A token pair is issued even though the account is pending.
    assert!(
        register
            .json_path(&["data", "tokens", "access_token"])
            .is_string()
    );
    let pending_access = register
        .json_path(&["data", "tokens", "access_token"])
        .as_str()
        .unwrap()
        .to_string();

    // The pending token is rejected by protected routes.
    let me = app.request("GET", "/api/auth/me", None, Some(&pending_access)).await;
    assert_eq!(me.status, StatusCode::FORBIDDEN);
    assert_eq!(me.error_code(), Some("ACCOUNT_DISABLED"));

    // Login before approval fails with ACCOUNT_DISABLED.
    let early_login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(early_login.status, StatusCode::FORBIDDEN);
    assert_eq!(early_login.error_code(), Some("ACCOUNT_DISABLED"));

    // Admin approves: role becomes client, account active.
    let user_id = register
        .json_path(&["data", "user", "id"])
        .as_str()
        .unwrap()
        .to_string();
    let admin_token = app.login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let approve = app
        .request(
            "POST",
            &format!("/api/users/{user_id}/approve"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(approve.status, StatusCode::OK);
    assert_eq!(
        approve.json_path(&["data", "roles"]),
        &serde_json::json!(["client"])
    );
    assert_eq!(approve.json_path(&["data", "active"]), true);

    // Login now succeeds with an access + refresh token pair.
    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "alice@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let access = login
        .json_path(&["data", "tokens", "access_token"])
        .as_str()
        .unwrap()
        .to_string();
    let refresh = login
        .json_path(&["data", "tokens", "refresh_token"])
        .as_str()
        .unwrap()
        .to_string();

    // Refresh rotates the token pair.
    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_refresh = refreshed
        .json_path(&["data", "tokens", "refresh_token"])
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(refresh, new_refresh);

    // The old refresh token is single-use: replay fails.
    let replay = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": refresh })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_code(), Some("INVALID_REFRESH_TOKEN"));

    // Logout always reports success, twice in a row.
    for _ in 0..2 {
        let logout = app
            .request(
                "POST",
                "/api/auth/logout",
                Some(serde_json::json!({ "refresh_token": new_refresh })),
                None,
            )
            .await;
        assert_eq!(logout.status, StatusCode::OK);
    }

    // The refresh path is dead after logout.
    let after_logout = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": new_refresh })),
            None,
        )
        .await;
    assert_eq!(after_logout.status, StatusCode::UNAUTHORIZED);

    // The access token is not individually revoked by logout: it keeps
    // verifying until its own expiry elapses.
    let verify = app
        .request("POST", "/api/auth/verify", None, Some(&access))
        .await;
    assert_eq!(verify.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_register_rejects_bad_inputs() {
    let app = TestApp::new().await;

    // Invalid email.
    let bad_email = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "not-an-email",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), Some("EMAIL_INVALID"));

    // Weak password carries the complete violation list.
    let weak = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "bob@example.com",
                "password": "abc",
            })),
            None,
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.error_code(), Some("PASSWORD_WEAK"));
    let errors = weak.body.get("errors").and_then(|e| e.as_array()).unwrap();
    assert!(errors.len() >= 3, "expected all violations, got {errors:?}");

    // Duplicate email, case-insensitively.
    let first = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "carol@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let duplicate = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "CAROL@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), Some("EMAIL_ALREADY_EXISTS"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_login_failures_are_enumeration_safe() {
    let app = TestApp::new().await;
    app.register_and_approve("dave@example.com", "GoodPass1!").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "dave@example.com",
                "password": "WrongPass1!",
            })),
            None,
        )
        .await;

    let unknown_email = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;

    // Identical observable outcome for both failure causes.
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error_code(), Some("INVALID_CREDENTIALS"));
    assert_eq!(unknown_email.error_code(), Some("INVALID_CREDENTIALS"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_change_password_requires_current() {
    let app = TestApp::new().await;
    app.register_and_approve("erin@example.com", "GoodPass1!").await;
    let token = app.login("erin@example.com", "GoodPass1!").await;

    let wrong_current = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "NotMyPass1!",
                "new_password": "NewGoodPass1!",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong_current.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_current.error_code(), Some("INVALID_CURRENT_PASSWORD"));

    let changed = app
        .request(
            "PUT",
            "/api/auth/password",
            Some(serde_json::json!({
                "current_password": "GoodPass1!",
                "new_password": "NewGoodPass1!",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    // Old password no longer works; new one does.
    let old = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "erin@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    app.login("erin@example.com", "NewGoodPass1!").await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_concurrent_sessions_and_bulk_logout() {
    let app = TestApp::new().await;
    app.register_and_approve("frank@example.com", "GoodPass1!").await;

    // Logins are additive: registration already opened one session, and
    // each login adds another.
    let first = app.login("frank@example.com", "GoodPass1!").await;
    let _second = app.login("frank@example.com", "GoodPass1!").await;

    let sessions = app.request("GET", "/api/sessions", None, Some(&first)).await;
    assert_eq!(sessions.status, StatusCode::OK);
    let listed = sessions.json_path(&["data"]).as_array().unwrap();
    assert_eq!(listed.len(), 3);
    assert_eq!(
        listed.iter().filter(|s| s["current"] == true).count(),
        1,
        "exactly one session is the caller's current one"
    );

    // Everywhere-but-here invalidates all other sessions.
    let invalidated = app
        .request("POST", "/api/sessions/invalidate-all", None, Some(&first))
        .await;
    assert_eq!(invalidated.status, StatusCode::OK);
    assert_eq!(invalidated.json_path(&["data", "count"]), 2);

    let remaining = app.request("GET", "/api/sessions", None, Some(&first)).await;
    assert_eq!(remaining.json_path(&["data"]).as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let no_token = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(no_token.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_token.error_code(), Some("TOKEN_REQUIRED"));

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not-a-token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.error_code(), Some("INVALID_TOKEN"));
}
