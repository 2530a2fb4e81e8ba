//! `AuthUser` extractor — the access gate for protected routes.
//!
//! Pulls the bearer token from the Authorization header, verifies it
//! through the auth service (which re-loads the user and re-checks account
//! state at use-time), and injects a [`RequestContext`] into the handler.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use authhub_core::error::{AppError, ErrorCode};
use authhub_service::context::RequestContext;

use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::new(ErrorCode::TokenRequired, "Missing bearer access token")
            })?;

        let verified = state.auth_service.verify_access_token(token).await?;

        // Advisory: record activity on the session behind this token.
        state
            .session_store
            .touch_last_activity(verified.claims.session_id())
            .await;

        let roles = verified.user.role_names();
        Ok(AuthUser(RequestContext::new(
            verified.user.user.id,
            verified.claims.session_id(),
            verified.user.user.email,
            roles,
        )))
    }
}
