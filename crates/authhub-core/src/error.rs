//! Unified application error types for AuthHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every error carries a machine-readable
//! [`ErrorCode`] that the API layer projects onto an HTTP status; business
//! rule violations are expected outcomes and always get a precise code, while
//! unexpected persistence or configuration faults collapse into
//! [`ErrorCode::InternalError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error codes exposed to API clients.
///
/// The serialized form is the SCREAMING_SNAKE_CASE name, which is what ends
/// up in the `code` field of error response envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input, rejected before any business logic ran.
    ValidationError,
    /// The supplied email address is not a valid email.
    EmailInvalid,
    /// Registration conflict: the email is already taken.
    EmailAlreadyExists,
    /// The supplied password fails the strength policy.
    PasswordWeak,
    /// Login failed. Deliberately covers both unknown-account and
    /// wrong-password so responses cannot be used for account enumeration.
    InvalidCredentials,
    /// The current password given to a password change was wrong.
    InvalidCurrentPassword,
    /// The account exists but is not (or no longer) active.
    AccountDisabled,
    /// The account has been locked by an administrator.
    AccountLocked,
    /// The presented refresh token matches no live session.
    InvalidRefreshToken,
    /// The session behind the refresh token has expired or been revoked.
    SessionExpired,
    /// No bearer token was supplied on a protected route.
    TokenRequired,
    /// The access token's signature is valid but it has expired.
    TokenExpired,
    /// The access token is malformed or its signature does not verify.
    InvalidToken,
    /// Referenced user does not exist.
    UserNotFound,
    /// Referenced role does not exist.
    RoleNotFound,
    /// The user already holds the role being assigned.
    RoleAlreadyAssigned,
    /// A role with that name already exists in the catalog.
    RoleAlreadyExists,
    /// The role cannot be deleted while users still hold it.
    RoleHasUsers,
    /// The caller lacks a required role.
    InsufficientPermissions,
    /// The caller may not act on this resource.
    AccessDenied,
    /// The user cannot be deleted because other records reference it.
    UserHasDependencies,
    /// Catch-all for unexpected failures. Message text is suppressed in
    /// production mode; the code stays precise.
    InternalError,
}

impl ErrorCode {
    /// Return the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::EmailInvalid => "EMAIL_INVALID",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::PasswordWeak => "PASSWORD_WEAK",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::TokenRequired => "TOKEN_REQUIRED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::RoleAlreadyAssigned => "ROLE_ALREADY_ASSIGNED",
            Self::RoleAlreadyExists => "ROLE_ALREADY_EXISTS",
            Self::RoleHasUsers => "ROLE_HAS_USERS",
            Self::InsufficientPermissions => "INSUFFICIENT_PERMISSIONS",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::UserHasDependencies => "USER_HAS_DEPENDENCIES",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated rule on one input field, reported alongside
/// [`ErrorCode::ValidationError`] and [`ErrorCode::PasswordWeak`].
///
/// Validation reports the complete list of violations, not just the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The input field the rule applies to.
    pub field: String,
    /// Human-readable description of the violated rule.
    pub message: String,
    /// The offending value, when safe to echo (never for credentials).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldViolation {
    /// Create a violation without echoing the offending value.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Create a violation that echoes the offending value back.
    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.into()),
        }
    }
}

/// The unified application error used throughout AuthHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Machine-readable code from the error taxonomy.
    pub code: ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// Per-field violations for validation failures (empty otherwise).
    pub violations: Vec<FieldViolation>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    /// Attach per-field violations to this error.
    pub fn with_violations(mut self, violations: Vec<FieldViolation>) -> Self {
        self.violations = violations;
        self
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Create the enumeration-safe login failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid email or password")
    }

    /// Create an account-disabled error.
    pub fn account_disabled() -> Self {
        Self::new(
            ErrorCode::AccountDisabled,
            "Account is not active. Contact an administrator.",
        )
    }

    /// Create an account-locked error.
    pub fn account_locked() -> Self {
        Self::new(
            ErrorCode::AccountLocked,
            "Account is locked. Contact an administrator.",
        )
    }

    /// Create a user-not-found error.
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Create a role-not-found error.
    pub fn role_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RoleNotFound, message)
    }

    /// Create an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AccessDenied, message)
    }

    /// Create an insufficient-permissions error.
    pub fn insufficient_permissions(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientPermissions, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create an internal error wrapping a persistence-layer failure.
    pub fn database(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::with_source(ErrorCode::InternalError, message, source)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Whether this error is an unexpected internal fault whose message
    /// must not leak to clients in production mode.
    pub fn is_internal(&self) -> bool {
        self.code == ErrorCode::InternalError
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            code: self.code,
            message: self.message.clone(),
            violations: self.violations.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorCode::InternalError,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorCode::InternalError,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
