//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::role::{Role, roles};

/// A registered account in the AuthHub system.
///
/// Emails are normalized to lowercase before storage and lookup; the
/// repository enforces case-insensitive uniqueness on top of that.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address, stored lowercase, unique system-wide.
    pub email: String,
    /// Argon2id password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Whether the account may authenticate. New registrations start
    /// inactive until an administrator approves them.
    pub active: bool,
    /// Administrative lock, independent of `active`.
    pub locked: bool,
    /// Number of consecutive failed login attempts.
    pub failed_login_attempts: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this account is currently allowed to authenticate.
    ///
    /// An inactive account never authenticates; a locked account never
    /// authenticates regardless of `active`.
    pub fn can_authenticate(&self) -> bool {
        self.active && !self.locked
    }
}

/// A user together with their current roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithRoles {
    /// The user record.
    #[serde(flatten)]
    pub user: User,
    /// Roles currently held by the user.
    pub roles: Vec<Role>,
}

impl UserWithRoles {
    /// Lowercase role names for token claims.
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    /// Whether the user holds the named role (case-insensitive).
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Whether the user holds any of the named roles (case-insensitive).
    pub fn has_any_role<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().any(|n| self.has_role(n))
    }

    /// Whether the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.has_role(roles::ADMIN)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalized (lowercase) email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Initial activation state. Self-registrations pass `false`;
    /// the bootstrap administrator passes `true`.
    pub active: bool,
}

/// Allow-listed mutable fields for a user update.
///
/// `None` leaves a field unchanged. The password hash is deliberately not
/// updatable through this path; password changes go through the dedicated
/// change-password operation.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New display name.
    pub display_name: Option<String>,
    /// New activation state.
    pub active: Option<bool>,
    /// New lock state.
    pub locked: Option<bool>,
    /// New failed-attempt counter value.
    pub failed_login_attempts: Option<i32>,
}
