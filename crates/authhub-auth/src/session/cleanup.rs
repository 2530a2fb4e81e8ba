//! Expired session cleanup.

use std::sync::Arc;

use tracing::info;

use authhub_core::result::AppResult;

use super::store::SessionStore;

/// Runs expired-session sweeps.
///
/// Scheduling is the caller's concern: the server binary drives this from
/// a periodic task, and administrators can trigger it on demand through
/// the session administration API. The sweep only flips already-expired,
/// still-active rows to inactive, so it is safe to run concurrently with
/// normal traffic.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session store for the sweep operation.
    session_store: Arc<SessionStore>,
}

impl SessionCleanup {
    /// Creates a new cleanup handler.
    pub fn new(session_store: Arc<SessionStore>) -> Self {
        Self { session_store }
    }

    /// Runs one cleanup cycle, returning the number of sessions
    /// deactivated.
    pub async fn run_cleanup(&self) -> AppResult<u64> {
        let swept = self.session_store.sweep_expired().await?;

        if swept > 0 {
            info!(count = swept, "Expired sessions deactivated");
        }

        Ok(swept)
    }
}
