//! Auth handlers — register, login, refresh, logout, password change.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use authhub_auth::service::{AuthSession, ClientContext, LogoutOutcome};
use authhub_core::error::AppError;

use crate::dto::request::{
    ChangePasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest,
};
use crate::dto::response::{ApiResponse, AuthResponse, CountResponse, MessageResponse, UserResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let result = state
        .auth_service
        .register(
            &req.email,
            &req.password,
            req.name.as_deref(),
            &client_context(&headers),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Registration successful. The account is pending administrative approval.",
            auth_response(result),
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let result = state
        .auth_service
        .login(&req.email, &req.password, &client_context(&headers))
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        auth_response(result),
    )))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let result = state.auth_service.refresh_tokens(&req.refresh_token).await?;

    Ok(Json(ApiResponse::with_message(
        "Tokens refreshed",
        auth_response(result),
    )))
}

/// POST /api/auth/logout
///
/// Always reports success: a failed server-side invalidation must not
/// keep a client from discarding its credentials. A missing or malformed
/// body is treated as "no token given".
pub async fn logout(
    State(state): State<AppState>,
    body: axum::body::Bytes,
) -> Json<ApiResponse<MessageResponse>> {
    let req: LogoutRequest = serde_json::from_slice(&body).unwrap_or_default();
    let outcome = state.auth_service.logout(req.refresh_token.as_deref()).await;

    let message = match outcome {
        LogoutOutcome::Invalidated => "Logged out",
        LogoutOutcome::AlreadyLoggedOut | LogoutOutcome::BestEffort => "Already logged out",
    };

    Json(ApiResponse::ok(MessageResponse {
        message: message.to_string(),
    }))
}

/// POST /api/auth/logout-all
///
/// Invalidates every session of the caller, including the current one.
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, AppError> {
    let count = state
        .auth_service
        .logout_all_sessions(auth.user_id, None)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "All sessions invalidated",
        CountResponse { count },
    )))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .auth_service
        .change_password(auth.user_id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password changed".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(user.into())))
}

/// POST /api/auth/verify
///
/// The access gate has already verified the token and re-checked the
/// account; this endpoint just echoes the live identity back.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::with_message("Token is valid", user.into())))
}

/// Captures the client's user agent and IP from request headers.
fn client_context(headers: &HeaderMap) -> ClientContext {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    ClientContext {
        user_agent,
        ip_address,
    }
}

fn auth_response(result: AuthSession) -> AuthResponse {
    AuthResponse {
        user: result.user.into(),
        tokens: result.tokens.into(),
    }
}
