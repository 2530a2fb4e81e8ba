//! Session administration operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use authhub_auth::session::cleanup::SessionCleanup;
use authhub_auth::session::store::SessionStore;
use authhub_core::error::AppError;
use authhub_core::result::AppResult;
use authhub_entity::session::{Session, SessionStats};

use crate::context::RequestContext;

/// Handles session listing, stats, and invalidation for callers and
/// administrators.
#[derive(Debug, Clone)]
pub struct SessionService {
    /// Session store.
    sessions: Arc<SessionStore>,
    /// Expired-session sweep.
    cleanup: SessionCleanup,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        let cleanup = SessionCleanup::new(Arc::clone(&sessions));
        Self { sessions, cleanup }
    }

    /// Lists the caller's active sessions, newest first.
    pub async fn list_own(&self, ctx: &RequestContext) -> AppResult<Vec<Session>> {
        self.sessions.list_active_for_user(ctx.user_id).await
    }

    /// The caller's session counters.
    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<SessionStats> {
        self.sessions.stats_for_user(ctx.user_id).await
    }

    /// Invalidates one of the caller's own sessions. Ownership is
    /// enforced at the store level: a session belonging to someone else
    /// looks identical to a session that does not exist.
    pub async fn invalidate_own(&self, ctx: &RequestContext, session_id: Uuid) -> AppResult<()> {
        let invalidated = self
            .sessions
            .invalidate_one(session_id, Some(ctx.user_id))
            .await?;

        if !invalidated {
            return Err(AppError::access_denied("Session not found"));
        }

        info!(user_id = %ctx.user_id, session_id = %session_id, "Session invalidated");
        Ok(())
    }

    /// Invalidates all of the caller's sessions except the current one.
    /// Returns the count invalidated.
    pub async fn invalidate_all_except_current(&self, ctx: &RequestContext) -> AppResult<u64> {
        let count = self
            .sessions
            .invalidate_all_for_user(ctx.user_id, Some(ctx.session_id))
            .await?;

        info!(user_id = %ctx.user_id, count, "Other sessions invalidated");
        Ok(count)
    }

    /// Runs the expired-session sweep on demand (admin maintenance).
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        self.cleanup.run_cleanup().await
    }
}
