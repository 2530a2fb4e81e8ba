//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime as a duration expression (`"15m"`, `"1h"`).
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl: String,
    /// Refresh token / session lifetime as a duration expression (`"7d"`).
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl: String,
    /// Adaptive hash work factor: Argon2id memory cost exponent (2^n KiB).
    #[serde(default = "default_work_factor")]
    pub hash_work_factor: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Email for the bootstrap administrator account created at startup
    /// when no user with this email exists. Leave unset to skip.
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,
    /// Password for the bootstrap administrator account.
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl: default_access_ttl(),
            refresh_token_ttl: default_refresh_ttl(),
            hash_work_factor: default_work_factor(),
            password_min_length: default_password_min(),
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> String {
    "15m".to_string()
}

fn default_refresh_ttl() -> String {
    "7d".to_string()
}

fn default_work_factor() -> u32 {
    12
}

fn default_password_min() -> usize {
    8
}
