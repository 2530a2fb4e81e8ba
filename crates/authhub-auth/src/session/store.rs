//! Session storage operations wrapping the database repository.
//!
//! This layer owns the validity predicate (including the lazy expiry
//! sweep side effect) and the issuance of refresh tokens; the repository
//! below it only moves rows.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use authhub_core::config::auth::AuthConfig;
use authhub_core::error::{AppError, ErrorCode};
use authhub_core::result::AppResult;
use authhub_core::types::duration::parse_duration;
use authhub_database::repositories::session::SessionRepository;
use authhub_entity::session::{
    CreateSession, Session, SessionStats, SessionWithOwner, summarize_user_agent,
};

/// A freshly created or rotated session together with the plaintext
/// refresh token. The token exists only in this value; at rest the store
/// keeps a digest.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// The persisted session record.
    pub session: Session,
    /// The plaintext refresh token to hand to the client.
    pub refresh_token: String,
}

/// Abstracts session persistence and token issuance.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session database repository.
    repo: Arc<SessionRepository>,
    /// Absolute session lifetime (refresh token TTL).
    session_ttl: Duration,
}

impl SessionStore {
    /// Creates a new session store.
    ///
    /// Fails if the configured refresh token TTL is not a valid duration
    /// expression.
    pub fn new(repo: Arc<SessionRepository>, config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            repo,
            session_ttl: parse_duration(&config.refresh_token_ttl)?,
        })
    }

    /// Creates a new session for a user: generates a fresh refresh token,
    /// computes the absolute expiry, and normalizes the user agent into a
    /// coarse device label.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        user_agent: Option<&str>,
        ip_address: Option<&str>,
    ) -> AppResult<IssuedSession> {
        let refresh_token = crate::refresh::generate_refresh_token();

        let session = self
            .repo
            .create(&CreateSession {
                user_id,
                refresh_token_hash: crate::refresh::token_digest(&refresh_token),
                user_agent: user_agent.map(String::from),
                device_label: user_agent.map(summarize_user_agent),
                ip_address: ip_address.map(String::from),
                expires_at: Utc::now() + self.session_ttl,
            })
            .await?;

        Ok(IssuedSession {
            session,
            refresh_token,
        })
    }

    /// Looks up a session by its plaintext refresh token and applies the
    /// full validity predicate: session active and unexpired, owner active
    /// and not locked.
    ///
    /// An unknown token fails with `INVALID_REFRESH_TOKEN`; a known but
    /// invalid session fails with `SESSION_EXPIRED`. Discovering an
    /// expired-but-still-active session flips it inactive as a side
    /// effect (lazy expiry sweep) rather than leaving it dangling.
    pub async fn find_valid_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> AppResult<SessionWithOwner> {
        let digest = crate::refresh::token_digest(refresh_token);

        let found = self
            .repo
            .find_by_refresh_token_hash(&digest)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::InvalidRefreshToken, "Refresh token is not recognized")
            })?;

        if found.session.active && found.session.is_expired() {
            // Lazy expiry sweep.
            let _ = self.repo.invalidate(found.session.id, None).await;
            info!(session_id = %found.session.id, "Expired session deactivated on lookup");
            return Err(AppError::new(
                ErrorCode::SessionExpired,
                "Session has expired",
            ));
        }

        if !found.is_valid() {
            return Err(AppError::new(
                ErrorCode::SessionExpired,
                "Session is no longer valid",
            ));
        }

        Ok(found)
    }

    /// Rotates a session's refresh token and extends its expiry. The
    /// presented token becomes permanently unusable once this returns.
    ///
    /// Rotation is a single guarded update: of two calls racing on the
    /// same token, the first writer wins and the loser fails with
    /// `INVALID_REFRESH_TOKEN`.
    pub async fn renew(&self, session: &Session) -> AppResult<IssuedSession> {
        let refresh_token = crate::refresh::generate_refresh_token();

        let renewed = self
            .repo
            .renew(
                session.id,
                &session.refresh_token_hash,
                &crate::refresh::token_digest(&refresh_token),
                Utc::now() + self.session_ttl,
            )
            .await?
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::InvalidRefreshToken,
                    "Refresh token was already used or revoked",
                )
            })?;

        Ok(IssuedSession {
            session: renewed,
            refresh_token,
        })
    }

    /// Lists a user's active, unexpired sessions, newest first.
    pub async fn list_active_for_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.repo.find_active_by_user(user_id).await
    }

    /// Invalidates one session, optionally scoped to an owning user for
    /// ownership enforcement. Returns whether a live session was affected.
    pub async fn invalidate_one(
        &self,
        session_id: Uuid,
        owner: Option<Uuid>,
    ) -> AppResult<bool> {
        self.repo.invalidate(session_id, owner).await
    }

    /// Invalidates every active session of a user except an optional
    /// survivor. Returns the count invalidated.
    pub async fn invalidate_all_for_user(
        &self,
        user_id: Uuid,
        except: Option<Uuid>,
    ) -> AppResult<u64> {
        self.repo.invalidate_all_for_user(user_id, except).await
    }

    /// Invalidates the session behind a plaintext refresh token.
    pub async fn invalidate_by_refresh_token(&self, refresh_token: &str) -> AppResult<bool> {
        let digest = crate::refresh::token_digest(refresh_token);
        self.repo.invalidate_by_refresh_token_hash(&digest).await
    }

    /// Advisory last-activity touch. Best-effort: failures are logged
    /// and swallowed, the outcome is unknown to the caller.
    pub async fn touch_last_activity(&self, session_id: Uuid) {
        if let Err(e) = self.repo.touch_last_activity(session_id).await {
            warn!(session_id = %session_id, error = %e, "Failed to touch session activity");
        }
    }

    /// Bulk-deactivates all sessions past expiry. Returns the count.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        self.repo.sweep_expired().await
    }

    /// Per-user session counters.
    pub async fn stats_for_user(&self, user_id: Uuid) -> AppResult<SessionStats> {
        self.repo.stats_for_user(user_id).await
    }
}
