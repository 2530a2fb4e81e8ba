//! Maps domain [`AppError`] to HTTP responses.
//!
//! This lives in `authhub-core` (not the API crate) because the orphan
//! rule requires the `IntoResponse` impl to reside in the crate that
//! defines `AppError`. It is gated behind the `axum` feature so the rest
//! of the crate stays framework-agnostic.

use std::sync::OnceLock;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, ErrorCode, FieldViolation};

/// Whether the server runs in production mode. Set once at startup;
/// defaults to false (development) when never set.
static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Record the production-mode flag for error rendering. Internal error
/// messages are replaced with a generic message when set.
pub fn set_production_mode(production: bool) {
    let _ = PRODUCTION_MODE.set(production);
}

fn is_production() -> bool {
    *PRODUCTION_MODE.get().unwrap_or(&false)
}

/// Standard API error response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    /// Always false.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable error code.
    pub code: &'static str,
    /// Server time of the response.
    pub timestamp: DateTime<Utc>,
    /// Per-field violations for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

/// HTTP status for each error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::EmailInvalid | ErrorCode::PasswordWeak => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::InvalidCredentials
        | ErrorCode::InvalidCurrentPassword
        | ErrorCode::InvalidRefreshToken
        | ErrorCode::SessionExpired
        | ErrorCode::TokenRequired
        | ErrorCode::TokenExpired
        | ErrorCode::InvalidToken => StatusCode::UNAUTHORIZED,
        ErrorCode::AccountDisabled
        | ErrorCode::AccountLocked
        | ErrorCode::InsufficientPermissions
        | ErrorCode::AccessDenied => StatusCode::FORBIDDEN,
        ErrorCode::UserNotFound | ErrorCode::RoleNotFound => StatusCode::NOT_FOUND,
        ErrorCode::EmailAlreadyExists
        | ErrorCode::RoleAlreadyAssigned
        | ErrorCode::RoleAlreadyExists
        | ErrorCode::RoleHasUsers
        | ErrorCode::UserHasDependencies => StatusCode::CONFLICT,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);

        let message = if self.is_internal() {
            tracing::error!(error = %self.message, "Internal server error");
            if is_production() {
                "An internal error occurred".to_string()
            } else {
                self.message.clone()
            }
        } else {
            self.message.clone()
        };

        let body = ApiErrorResponse {
            success: false,
            message,
            code: self.code.as_str(),
            timestamp: Utc::now(),
            errors: if self.violations.is_empty() {
                None
            } else {
                Some(self.violations.clone())
            },
        };

        (status, Json(body)).into_response()
    }
}
