//! Integration tests for user and session administration.
//!
//! Requires PostgreSQL; run with
//! `AUTHHUB_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use common::TestApp;
use http::StatusCode;

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_admin_endpoints_reject_non_admins() {
    let app = TestApp::new().await;
    app.register_and_approve("gina@example.com", "GoodPass1!").await;
    let token = app.login("gina@example.com", "GoodPass1!").await;

    let listing = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);
    assert_eq!(listing.error_code(), Some("INSUFFICIENT_PERMISSIONS"));

    let cleanup = app
        .request("POST", "/api/sessions/cleanup", None, Some(&token))
        .await;
    assert_eq!(cleanup.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_get_user_allows_self_but_not_others() {
    let app = TestApp::new().await;
    let own_id = app.register_and_approve("henry@example.com", "GoodPass1!").await;
    let other_id = app.register_and_approve("iris@example.com", "GoodPass1!").await;
    let token = app.login("henry@example.com", "GoodPass1!").await;

    let own = app
        .request("GET", &format!("/api/users/{own_id}"), None, Some(&token))
        .await;
    assert_eq!(own.status, StatusCode::OK);

    let other = app
        .request("GET", &format!("/api/users/{other_id}"), None, Some(&token))
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.error_code(), Some("ACCESS_DENIED"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_role_replacement_is_remove_all_then_assign() {
    let app = TestApp::new().await;
    let user_id = app.register_and_approve("judy@example.com", "GoodPass1!").await;
    let admin_token = app.login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;

    // Stack a second role on top of client.
    let assign = app
        .request(
            "POST",
            &format!("/api/users/{user_id}/roles/employee"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(assign.status, StatusCode::OK);
    let roles = assign.json_path(&["data", "roles"]).as_array().unwrap();
    assert_eq!(roles.len(), 2);

    // Duplicate assignment is its own error.
    let duplicate = app
        .request(
            "POST",
            &format!("/api/users/{user_id}/roles/employee"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
    assert_eq!(duplicate.error_code(), Some("ROLE_ALREADY_ASSIGNED"));

    // Replacement collapses the set to exactly one role.
    let change = app
        .request(
            "PUT",
            &format!("/api/users/{user_id}/role"),
            Some(serde_json::json!({ "role": "employee" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(change.status, StatusCode::OK);
    assert_eq!(
        change.json_path(&["data", "roles"]),
        &serde_json::json!(["employee"])
    );

    // Unknown roles are reference errors.
    let unknown = app
        .request(
            "PUT",
            &format!("/api/users/{user_id}/role"),
            Some(serde_json::json!({ "role": "warlord" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error_code(), Some("ROLE_NOT_FOUND"));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_toggle_active_blocks_login_and_live_tokens() {
    let app = TestApp::new().await;
    let user_id = app.register_and_approve("kate@example.com", "GoodPass1!").await;
    let token = app.login("kate@example.com", "GoodPass1!").await;
    let admin_token = app.login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;

    let toggled = app
        .request(
            "POST",
            &format!("/api/users/{user_id}/toggle-active"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(toggled.status, StatusCode::OK);
    assert_eq!(toggled.json_path(&["data", "active"]), false);

    // Account state at use-time governs: the still-unexpired access token
    // is now rejected.
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::FORBIDDEN);
    assert_eq!(me.error_code(), Some("ACCOUNT_DISABLED"));

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "kate@example.com",
                "password": "GoodPass1!",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_permanent_delete_removes_user_and_roles() {
    let app = TestApp::new().await;
    let user_id = app.register_and_approve("liam@example.com", "GoodPass1!").await;
    let admin_token = app.login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/users/{user_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app
        .request(
            "GET",
            &format!("/api/users/{user_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.error_code(), Some("USER_NOT_FOUND"));

    // Deleting again reports the same reference error.
    let again = app
        .request(
            "DELETE",
            &format!("/api/users/{user_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set AUTHHUB_TEST_DATABASE_URL)"]
async fn test_session_stats_and_cleanup() {
    let app = TestApp::new().await;
    app.register_and_approve("mona@example.com", "GoodPass1!").await;
    let token = app.login("mona@example.com", "GoodPass1!").await;

    let stats = app
        .request("GET", "/api/sessions/stats", None, Some(&token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    // Registration opened one session, login another.
    assert_eq!(stats.json_path(&["data", "active"]), 2);
    assert_eq!(stats.json_path(&["data", "total"]), 2);

    // Force one session past expiry, then sweep as admin.
    sqlx::query(
        "UPDATE sessions SET expires_at = NOW() - INTERVAL '1 hour' \
         WHERE id = (SELECT id FROM sessions ORDER BY created_at ASC LIMIT 1)",
    )
    .execute(&app.db_pool)
    .await
    .unwrap();

    let admin_token = app.login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD).await;
    let cleanup = app
        .request("POST", "/api/sessions/cleanup", None, Some(&admin_token))
        .await;
    assert_eq!(cleanup.status, StatusCode::OK);
    assert_eq!(cleanup.json_path(&["data", "count"]), 1);
}
