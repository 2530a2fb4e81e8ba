//! JWT claims structure embedded in access tokens.
//!
//! Refresh tokens are opaque random strings validated purely by store
//! lookup; only access tokens are structured.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload embedded in every access token.
///
/// Roles are captured at issuance time. The account state at use-time
/// governs authorization, so verification always re-loads the user; the
/// claim list exists for clients and for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// Session ID this token was issued under.
    pub sid: Uuid,
    /// Email at issuance time.
    pub email: String,
    /// Role names at issuance time.
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token identifier.
    pub jti: Uuid,
}

impl Claims {
    /// The user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// The session this token belongs to.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
