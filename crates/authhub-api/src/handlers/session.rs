//! Session listing and administration handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use authhub_core::error::AppError;

use crate::dto::response::{ApiResponse, CountResponse, SessionResponse};
use crate::extractors::AuthUser;
use crate::middleware::guard::require_admin;
use crate::state::AppState;

/// GET /api/sessions — the caller's active sessions, newest first.
pub async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, AppError> {
    let sessions = state.session_service.list_own(&auth).await?;

    let items = sessions
        .into_iter()
        .map(|s| SessionResponse::from_session(s, auth.session_id))
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/sessions/stats — the caller's session counters.
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<authhub_entity::session::SessionStats>>, AppError> {
    let stats = state.session_service.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// DELETE /api/sessions/{id} — invalidate one of the caller's sessions.
pub async fn invalidate_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    state.session_service.invalidate_own(&auth, session_id).await?;
    Ok(Json(ApiResponse::with_message(
        "Session invalidated",
        CountResponse { count: 1 },
    )))
}

/// POST /api/sessions/invalidate-all — everywhere but here.
pub async fn invalidate_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let count = state
        .session_service
        .invalidate_all_except_current(&auth)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Other sessions invalidated",
        CountResponse { count },
    )))
}

/// POST /api/sessions/cleanup (admin) — expired-session sweep on demand.
pub async fn cleanup(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    require_admin(&auth)?;

    let count = state.session_service.cleanup_expired().await?;
    Ok(Json(ApiResponse::with_message(
        "Expired sessions deactivated",
        CountResponse { count },
    )))
}
