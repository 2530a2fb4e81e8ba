//! Session maintenance configuration.

use serde::{Deserialize, Serialize};

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether the periodic expired-session sweep task runs.
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,
    /// Interval between expired-session sweeps, in minutes.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_enabled: default_true(),
            cleanup_interval_minutes: default_cleanup_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    60
}
