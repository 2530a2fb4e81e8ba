//! Route definitions for the AuthHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(session_routes())
        .merge(user_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, password, identity.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout-all", post(handlers::auth::logout_all))
        .route("/auth/password", put(handlers::auth::change_password))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/verify", post(handlers::auth::verify))
}

/// Session self-service and maintenance endpoints.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(handlers::session::list_own))
        .route("/sessions/stats", get(handlers::session::stats))
        .route("/sessions/{id}", delete(handlers::session::invalidate_one))
        .route(
            "/sessions/invalidate-all",
            post(handlers::session::invalidate_all),
        )
        .route("/sessions/cleanup", post(handlers::session::cleanup))
}

/// User administration endpoints.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}", get(handlers::user::get_user))
        .route("/users/{id}", put(handlers::user::update_user))
        .route("/users/{id}", delete(handlers::user::delete_user))
        .route("/users/{id}/approve", post(handlers::user::approve_user))
        .route(
            "/users/{id}/deactivate",
            post(handlers::user::deactivate_user),
        )
        .route("/users/{id}/role", put(handlers::user::change_role))
        .route(
            "/users/{id}/roles/{name}",
            post(handlers::user::assign_role),
        )
        .route(
            "/users/{id}/roles/{name}",
            delete(handlers::user::remove_role),
        )
        .route(
            "/users/{id}/toggle-active",
            post(handlers::user::toggle_active),
        )
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
