//! Role catalog model.
//!
//! Roles live in a small, mostly-static catalog seeded at startup. End
//! users never create roles; administrators assign and remove them through
//! the user administration endpoints.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Well-known role names.
pub mod roles {
    /// Full administrative access.
    pub const ADMIN: &str = "admin";
    /// Internal staff account.
    pub const EMPLOYEE: &str = "employee";
    /// Regular customer account.
    pub const CLIENT: &str = "client";
    /// Marker role for freshly registered accounts awaiting approval.
    pub const PENDING: &str = "pending";
}

/// The roles seeded by the idempotent startup bootstrap.
pub const DEFAULT_ROLES: &[(&str, &str)] = &[
    (roles::ADMIN, "Full administrative access"),
    (roles::EMPLOYEE, "Internal staff account"),
    (roles::CLIENT, "Regular customer account"),
    (roles::PENDING, "Awaiting administrative approval"),
];

/// A role in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Numeric role identifier.
    pub id: i32,
    /// Unique lowercase role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl Role {
    /// Whether this is the pending-approval marker role.
    pub fn is_pending(&self) -> bool {
        self.name == roles::PENDING
    }
}
