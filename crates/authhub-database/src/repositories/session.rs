//! Session repository implementation.
//!
//! Sessions are invalidated by flipping `active` to false, never deleted;
//! `revoked_at` records when. Refresh-token rotation is a single guarded
//! UPDATE so that two racing rotations of the same token cannot both
//! succeed: the statement matches on the old digest, and the loser sees
//! zero rows affected.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use authhub_core::error::AppError;
use authhub_core::result::AppResult;
use authhub_entity::session::{CreateSession, Session, SessionStats, SessionWithOwner};

/// Repository for session persistence operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new session record.
    pub async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, refresh_token_hash, user_agent, device_label, \
                                   ip_address, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.user_id)
        .bind(&data.refresh_token_hash)
        .bind(&data.user_agent)
        .bind(&data.device_label)
        .bind(&data.ip_address)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to create session", e))
    }

    /// Find a session by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to find session", e))
    }

    /// Find a session by refresh-token digest, joined with the owning
    /// user's state flags for the validity predicate.
    pub async fn find_by_refresh_token_hash(
        &self,
        hash: &str,
    ) -> AppResult<Option<SessionWithOwner>> {
        sqlx::query_as::<_, SessionWithOwner>(
            "SELECT s.*, u.active AS owner_active, u.locked AS owner_locked \
             FROM sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.refresh_token_hash = $1",
        )
        .bind(hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to find session by refresh token", e))
    }

    /// List a user's active, unexpired sessions, newest first.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE user_id = $1 AND active AND expires_at > NOW() \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to list active sessions", e))
    }

    /// Invalidate one session, optionally scoped to an owning user so a
    /// caller can only invalidate their own sessions. Returns whether a
    /// live session was invalidated.
    pub async fn invalidate(&self, session_id: Uuid, owner: Option<Uuid>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET active = FALSE, revoked_at = NOW() \
             WHERE id = $1 AND active AND ($2::uuid IS NULL OR user_id = $2)",
        )
        .bind(session_id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to invalidate session", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Invalidate every active session of a user, optionally keeping one
    /// (used by "log out everywhere but here"). Returns the count.
    pub async fn invalidate_all_for_user(
        &self,
        user_id: Uuid,
        except: Option<Uuid>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET active = FALSE, revoked_at = NOW() \
             WHERE user_id = $1 AND active AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(user_id)
        .bind(except)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to invalidate user sessions", e))?;

        Ok(result.rows_affected())
    }

    /// Invalidate the session holding the given refresh-token digest.
    /// Returns whether a live session was invalidated.
    pub async fn invalidate_by_refresh_token_hash(&self, hash: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET active = FALSE, revoked_at = NOW() \
             WHERE refresh_token_hash = $1 AND active",
        )
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to invalidate session by token", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Rotate a session's refresh token and extend its expiry in one
    /// guarded statement. The guard on the old digest makes the first
    /// writer win: a concurrent rotation of the same token matches zero
    /// rows and gets `None`.
    pub async fn renew(
        &self,
        session_id: Uuid,
        old_hash: &str,
        new_hash: &str,
        new_expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "UPDATE sessions SET refresh_token_hash = $3, expires_at = $4, last_activity = NOW() \
             WHERE id = $1 AND refresh_token_hash = $2 AND active AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(session_id)
        .bind(old_hash)
        .bind(new_hash)
        .bind(new_expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to renew session", e))
    }

    /// Update the advisory last-activity timestamp.
    pub async fn touch_last_activity(&self, session_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET last_activity = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to update last activity", e))?;
        Ok(())
    }

    /// Bulk-deactivate all sessions past their expiry. Returns the count
    /// affected. Safe to run concurrently with normal traffic.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET active = FALSE, revoked_at = NOW() \
             WHERE active AND expires_at <= NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to sweep expired sessions", e))?;

        Ok(result.rows_affected())
    }

    /// Per-user session counters: live sessions and all-time total.
    pub async fn stats_for_user(&self, user_id: Uuid) -> AppResult<SessionStats> {
        sqlx::query_as::<_, SessionStats>(
            "SELECT COUNT(*) FILTER (WHERE active AND expires_at > NOW()) AS active, \
                    COUNT(*) AS total \
             FROM sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database("Failed to compute session stats", e))
    }
}
