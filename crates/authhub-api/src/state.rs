//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use authhub_auth::service::AuthService;
use authhub_auth::session::store::SessionStore;
use authhub_core::config::AppConfig;
use authhub_service::session::service::SessionService;
use authhub_service::user::admin::UserAdminService;
use authhub_service::user::service::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db_pool: PgPool,
    /// Authentication state machine.
    pub auth_service: Arc<AuthService>,
    /// Session store (advisory activity touches).
    pub session_store: Arc<SessionStore>,
    /// User self-service.
    pub user_service: Arc<UserService>,
    /// User administration.
    pub user_admin_service: Arc<UserAdminService>,
    /// Session administration.
    pub session_service: Arc<SessionService>,
}
