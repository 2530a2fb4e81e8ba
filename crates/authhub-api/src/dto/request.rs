//! Request DTOs with validation.
//!
//! Declarative validation covers presence and shape only; business-level
//! checks (email semantics, password strength) live in the auth service so
//! their failures carry the precise error codes.

use serde::Deserialize;
use validator::Validate;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Display name (optional).
    pub name: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body. The refresh token travels in the body,
/// never in a header.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request body. A missing token means the client is already
/// logged out; logout succeeds either way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token of the session to invalidate.
    pub refresh_token: Option<String>,
}

/// Password change request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Self-service profile update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
}

/// Administrative user update.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUpdateUserRequest {
    /// New display name.
    pub name: Option<String>,
    /// New activation state (admin-only).
    pub active: Option<bool>,
    /// New lock state (admin-only).
    pub locked: Option<bool>,
}

/// Role replacement request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    /// The new role name.
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

/// Query parameters for the user list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Case-insensitive substring search over email and display name.
    pub search: Option<String>,
    /// Include inactive accounts.
    #[serde(default)]
    pub include_inactive: bool,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    25
}
