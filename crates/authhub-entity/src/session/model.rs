//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated device/client instance.
///
/// Sessions are created on every successful login and registration,
/// rotated on refresh, and invalidated (never physically deleted) on
/// logout, administrative action, or expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the refresh token. The plaintext token is
    /// returned to the client exactly once per issuance and never stored.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    /// Raw User-Agent header value.
    pub user_agent: Option<String>,
    /// Coarse device/browser summary derived from the user agent.
    pub device_label: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Whether the session is still usable. Flipped to false on logout,
    /// administrative invalidation, or the expiry sweep; never flipped back.
    pub active: bool,
    /// When the session was invalidated (audit trail).
    pub revoked_at: Option<DateTime<Utc>>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Absolute expiration timestamp.
    pub expires_at: DateTime<Utc>,
    /// Last observed activity (advisory, best-effort).
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Whether the absolute expiry has passed.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Whether the session itself is live: active and not yet expired.
    ///
    /// The full validity predicate also requires the owning user to be
    /// active and unlocked; see [`SessionWithOwner::is_valid`].
    pub fn is_live(&self) -> bool {
        self.active && !self.is_expired()
    }
}

/// A session joined with the minimal owning-user fields needed for the
/// validity predicate.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithOwner {
    /// The session record.
    #[sqlx(flatten)]
    pub session: Session,
    /// Owning user's `active` flag.
    pub owner_active: bool,
    /// Owning user's `locked` flag.
    pub owner_locked: bool,
}

impl SessionWithOwner {
    /// The full session validity predicate: the session is active and
    /// unexpired, and the owning user is active and not locked.
    ///
    /// Callers that discover an expired-but-still-active session are
    /// expected to flip it inactive (lazy expiry sweep); the store layer
    /// does that on every lookup.
    pub fn is_valid(&self) -> bool {
        self.session.is_live() && self.owner_active && !self.owner_locked
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// SHA-256 hex digest of the freshly generated refresh token.
    pub refresh_token_hash: String,
    /// Raw User-Agent header.
    pub user_agent: Option<String>,
    /// Coarse device label.
    pub device_label: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Absolute expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Per-user session counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct SessionStats {
    /// Sessions that are active and not yet expired.
    pub active: i64,
    /// All sessions ever recorded for the user.
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(active: bool, expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "digest".into(),
            user_agent: None,
            device_label: None,
            ip_address: None,
            active,
            revoked_at: None,
            created_at: now,
            expires_at: now + expires_in,
            last_activity: now,
        }
    }

    #[test]
    fn test_is_live_requires_active_and_unexpired() {
        assert!(session(true, Duration::hours(1)).is_live());
        assert!(!session(false, Duration::hours(1)).is_live());
        assert!(!session(true, Duration::hours(-1)).is_live());
    }

    #[test]
    fn test_validity_requires_owner_state() {
        let with_owner = |active, locked| SessionWithOwner {
            session: session(true, Duration::hours(1)),
            owner_active: active,
            owner_locked: locked,
        };
        assert!(with_owner(true, false).is_valid());
        assert!(!with_owner(false, false).is_valid());
        assert!(!with_owner(true, true).is_valid());
    }
}
