//! Shared test helpers for integration tests.
//!
//! These tests run against a real PostgreSQL instance named by
//! `AUTHHUB_TEST_DATABASE_URL` and are `#[ignore]`d by default so the
//! unit suite stays hermetic.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use authhub_core::config::app::{CorsConfig, ServerConfig};
use authhub_core::config::auth::AuthConfig;
use authhub_core::config::logging::LoggingConfig;
use authhub_core::config::session::SessionConfig;
use authhub_core::config::{AppConfig, DatabaseConfig};

/// Admin credentials seeded into every test application.
pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "AdminPass1!";

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
}

impl TestApp {
    /// Create a new test application against a clean database.
    pub async fn new() -> Self {
        let database_url = std::env::var("AUTHHUB_TEST_DATABASE_URL")
            .expect("AUTHHUB_TEST_DATABASE_URL must point at a test database");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
                cors: CorsConfig::default(),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
                min_connections: 1,
                connect_timeout_seconds: 5,
                idle_timeout_seconds: 60,
            },
            auth: AuthConfig {
                jwt_secret: "integration-test-secret".to_string(),
                bootstrap_admin_email: Some(ADMIN_EMAIL.to_string()),
                bootstrap_admin_password: Some(ADMIN_PASSWORD.to_string()),
                ..AuthConfig::default()
            },
            session: SessionConfig::default(),
            logging: LoggingConfig::default(),
        };

        let db = authhub_database::connection::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        authhub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let user_repo = Arc::new(authhub_database::repositories::user::UserRepository::new(
            db_pool.clone(),
        ));
        let role_repo = Arc::new(authhub_database::repositories::role::RoleRepository::new(
            db_pool.clone(),
        ));
        let session_repo = Arc::new(
            authhub_database::repositories::session::SessionRepository::new(db_pool.clone()),
        );

        role_repo
            .ensure_default_roles()
            .await
            .expect("Failed to seed roles");

        let password_hasher = Arc::new(
            authhub_auth::password::hasher::PasswordHasher::new(&config.auth)
                .expect("Failed to build hasher"),
        );
        let password_validator = Arc::new(
            authhub_auth::password::validator::PasswordValidator::new(&config.auth),
        );
        let jwt_encoder = Arc::new(
            authhub_auth::jwt::encoder::JwtEncoder::new(&config.auth)
                .expect("Failed to build encoder"),
        );
        let jwt_decoder = Arc::new(authhub_auth::jwt::decoder::JwtDecoder::new(&config.auth));
        let session_store = Arc::new(
            authhub_auth::session::store::SessionStore::new(
                Arc::clone(&session_repo),
                &config.auth,
            )
            .expect("Failed to build session store"),
        );

        let auth_service = Arc::new(authhub_auth::service::AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&role_repo),
            Arc::clone(&session_store),
            Arc::clone(&password_hasher),
            Arc::clone(&password_validator),
            Arc::clone(&jwt_encoder),
            Arc::clone(&jwt_decoder),
        ));

        auth_service
            .ensure_bootstrap_admin(&config.auth)
            .await
            .expect("Failed to seed bootstrap admin");

        let user_service = Arc::new(authhub_service::user::service::UserService::new(
            Arc::clone(&user_repo),
        ));
        let user_admin_service = Arc::new(authhub_service::user::admin::UserAdminService::new(
            Arc::clone(&user_repo),
            Arc::clone(&role_repo),
        ));
        let session_service = Arc::new(authhub_service::session::service::SessionService::new(
            Arc::clone(&session_store),
        ));

        let app_state = authhub_api::state::AppState {
            config: Arc::new(config),
            db_pool: db_pool.clone(),
            auth_service,
            session_store,
            user_service,
            user_admin_service,
            session_service,
        };

        let router = authhub_api::router::build_router(app_state);

        Self { router, db_pool }
    }

    /// Clean all test data from the database. Roles stay seeded.
    async fn clean_database(pool: &PgPool) {
        for table in ["sessions", "user_roles", "users"] {
            let query = format!("DELETE FROM {table}");
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Login and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .json_path(&["data", "tokens", "access_token"])
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Register a user and approve it as the bootstrap admin, returning
    /// the new user's ID.
    pub async fn register_and_approve(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );

        let user_id = response
            .json_path(&["data", "user", "id"])
            .as_str()
            .expect("No user id in register response")
            .to_string();

        let admin_token = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let approve = self
            .request(
                "POST",
                &format!("/api/users/{user_id}/approve"),
                None,
                Some(&admin_token),
            )
            .await;
        assert_eq!(
            approve.status,
            StatusCode::OK,
            "Approval failed: {:?}",
            approve.body
        );

        user_id
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

impl TestResponse {
    /// Walk a path through the JSON body.
    pub fn json_path(&self, path: &[&str]) -> &Value {
        let mut value = &self.body;
        for key in path {
            value = value.get(key).unwrap_or(&Value::Null);
        }
        value
    }

    /// The machine-readable error code, if present.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("code").and_then(|v| v.as_str())
    }
}
