//! Response DTOs and the success envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use authhub_auth::service::AuthTokens;
use authhub_entity::session::Session;
use authhub_entity::user::UserWithRoles;

/// Standard success response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Response payload.
    pub data: T,
    /// Server time of the response.
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response with the default message.
    pub fn ok(data: T) -> Self {
        Self::with_message("OK", data)
    }

    /// Creates a successful response with a custom message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// User summary for responses. The password hash never appears here.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Activation state.
    pub active: bool,
    /// Lock state.
    pub locked: bool,
    /// Current role names.
    pub roles: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<UserWithRoles> for UserResponse {
    fn from(value: UserWithRoles) -> Self {
        let roles = value.role_names();
        Self {
            id: value.user.id,
            email: value.user.email,
            name: value.user.display_name,
            active: value.user.active,
            locked: value.user.locked,
            roles,
            created_at: value.user.created_at,
        }
    }
}

/// Issued token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Signed access token for the Authorization header.
    pub access_token: String,
    /// Opaque refresh token; store it safely, it is shown exactly once.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

impl From<AuthTokens> for TokenResponse {
    fn from(value: AuthTokens) -> Self {
        Self {
            access_token: value.access_token,
            refresh_token: value.refresh_token,
            access_expires_at: value.access_expires_at,
            refresh_expires_at: value.refresh_expires_at,
        }
    }
}

/// Register/login/refresh payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: UserResponse,
    /// The issued tokens.
    pub tokens: TokenResponse,
}

/// One session in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Coarse device/browser label.
    pub device: Option<String>,
    /// Client IP at creation.
    pub ip_address: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Last observed activity.
    pub last_activity: DateTime<Utc>,
    /// Whether this is the session behind the presented access token.
    pub current: bool,
}

impl SessionResponse {
    /// Builds a listing row, marking the caller's current session.
    pub fn from_session(session: Session, current_session_id: Uuid) -> Self {
        Self {
            current: session.id == current_session_id,
            id: session.id,
            device: session.device_label,
            ip_address: session.ip_address,
            created_at: session.created_at,
            expires_at: session.expires_at,
            last_activity: session.last_activity,
        }
    }
}

/// Simple message payload.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Count payload.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// Count value.
    pub count: u64,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database reachability.
    pub database: String,
}
