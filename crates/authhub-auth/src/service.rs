//! The authentication state machine.
//!
//! Orchestrates the credential utilities and the user/role/session stores
//! to implement registration, login, token refresh, logout, password
//! changes, and access-token verification. Accounts move through
//! `unauthenticated → pending-approval → active session(s) →
//! expired/invalidated`; administrative approval is the only transition
//! out of pending.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use authhub_core::config::auth::AuthConfig;
use authhub_core::error::{AppError, ErrorCode, FieldViolation};
use authhub_core::result::AppResult;
use authhub_database::repositories::role::RoleRepository;
use authhub_database::repositories::user::UserRepository;
use authhub_entity::role::roles;
use authhub_entity::user::{CreateUser, UserWithRoles};

use crate::jwt::{Claims, JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::store::{IssuedSession, SessionStore};

/// Client context captured at login/registration time.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    /// Raw User-Agent header.
    pub user_agent: Option<String>,
    /// Client IP address.
    pub ip_address: Option<String>,
}

/// An access/refresh token pair with expiry metadata.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthTokens {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: chrono::DateTime<chrono::Utc>,
    /// Refresh token (session) expiration.
    pub refresh_expires_at: chrono::DateTime<chrono::Utc>,
}

/// Result of a successful register, login, or refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated user with current roles.
    pub user: UserWithRoles,
    /// The issued token pair.
    pub tokens: AuthTokens,
    /// The session the tokens belong to.
    pub session_id: Uuid,
}

/// A verified access token: the decoded claims plus the live user state.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// Claims from the token.
    pub claims: Claims,
    /// The user as loaded fresh from the store at verification time.
    pub user: UserWithRoles,
}

/// Outcome of a logout request.
///
/// Logout always reports success to the caller: the access token's expiry
/// alone bounds residual risk, and a failed server-side invalidation must
/// not block a client from discarding its credentials. The variants keep
/// the distinction observable for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The session was found live and has been invalidated.
    Invalidated,
    /// No live session matched the token (or no token was supplied).
    AlreadyLoggedOut,
    /// An internal failure was swallowed; the invalidation outcome is
    /// unknown.
    BestEffort,
}

/// The authentication and session lifecycle service.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserRepository>,
    roles: Arc<RoleRepository>,
    sessions: Arc<SessionStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    decoder: Arc<JwtDecoder>,
}

impl AuthService {
    /// Creates a new auth service with all required collaborators.
    pub fn new(
        users: Arc<UserRepository>,
        roles: Arc<RoleRepository>,
        sessions: Arc<SessionStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            users,
            roles,
            sessions,
            hasher,
            validator,
            encoder,
            decoder,
        }
    }

    /// Registers a new account.
    ///
    /// The account is created inactive and holds only the pending-approval
    /// role until an administrator promotes it. Registration still creates
    /// a session and issues tokens — the access token carries the pending
    /// role, and every route guard that requires an active account will
    /// reject it until approval.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
        context: &ClientContext,
    ) -> AppResult<AuthSession> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(AppError::new(
                ErrorCode::EmailInvalid,
                "Email address is not valid",
            ));
        }

        let report = self.validator.validate(password);
        if !report.is_valid() {
            return Err(password_weak(report.violations));
        }

        let password_hash = self.hasher.hash_password(password)?;

        let user = self
            .users
            .create(&CreateUser {
                email: email.clone(),
                password_hash,
                display_name: display_name.map(String::from),
                active: false,
            })
            .await?;

        let pending = self
            .roles
            .find_by_name(roles::PENDING)
            .await?
            .ok_or_else(|| AppError::internal("Role catalog is not seeded"))?;
        self.users.assign_role(user.id, pending.id).await?;

        let user = self.load_user_with_roles(user.id).await?;
        let result = self.open_session(user, context).await?;

        info!(user_id = %result.user.user.id, email = %email, "User registered, pending approval");
        Ok(result)
    }

    /// Authenticates a user and opens a new session.
    ///
    /// Logins are additive: each successful login creates a fresh session,
    /// one per device. The externally observable error for an unknown
    /// email and a wrong password is identical to prevent account
    /// enumeration; the distinction is logged internally only.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        context: &ClientContext,
    ) -> AppResult<AuthSession> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            debug!(email = %email, "Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !user.active {
            warn!(user_id = %user.id, "Login rejected: account disabled");
            return Err(AppError::account_disabled());
        }
        if user.locked {
            warn!(user_id = %user.id, "Login rejected: account locked");
            return Err(AppError::account_locked());
        }

        if !self.hasher.verify_password(password, &user.password_hash)? {
            let attempts = self.users.increment_failed_attempts(user.id).await?;
            warn!(user_id = %user.id, attempts, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }

        if user.failed_login_attempts > 0 {
            self.users.reset_failed_attempts(user.id).await?;
        }

        let user = self.load_user_with_roles(user.id).await?;
        let result = self.open_session(user, context).await?;

        info!(user_id = %result.user.user.id, session_id = %result.session_id, "Login successful");
        Ok(result)
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// Rotation-on-use: the presented refresh token becomes permanently
    /// unusable after this call, even if the caller never receives the
    /// new one. Roles are re-fetched so role changes since the last login
    /// are picked up.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let found = self
            .sessions
            .find_valid_by_refresh_token(refresh_token)
            .await?;

        let rotated = self.sessions.renew(&found.session).await?;

        let user = self.load_user_with_roles(found.session.user_id).await?;
        let (access_token, access_expires_at) = self
            .encoder
            .generate_access_token(&user, rotated.session.id)?;

        info!(user_id = %user.user.id, session_id = %rotated.session.id, "Tokens refreshed");

        Ok(AuthSession {
            session_id: rotated.session.id,
            tokens: AuthTokens {
                access_token,
                refresh_token: rotated.refresh_token,
                access_expires_at,
                refresh_expires_at: rotated.session.expires_at,
            },
            user,
        })
    }

    /// Invalidates the session behind a refresh token.
    ///
    /// Always succeeds from the caller's perspective; see
    /// [`LogoutOutcome`]. A missing token means the client is already
    /// logged out.
    pub async fn logout(&self, refresh_token: Option<&str>) -> LogoutOutcome {
        let Some(token) = refresh_token else {
            return LogoutOutcome::AlreadyLoggedOut;
        };

        match self.sessions.invalidate_by_refresh_token(token).await {
            Ok(true) => LogoutOutcome::Invalidated,
            Ok(false) => LogoutOutcome::AlreadyLoggedOut,
            Err(e) => {
                error!(error = %e, "Logout failed internally; reporting success to client");
                LogoutOutcome::BestEffort
            }
        }
    }

    /// Invalidates every active session of a user, optionally sparing one
    /// ("log out everywhere but here"). Returns the count invalidated.
    pub async fn logout_all_sessions(
        &self,
        user_id: Uuid,
        except_session_id: Option<Uuid>,
    ) -> AppResult<u64> {
        let count = self
            .sessions
            .invalidate_all_for_user(user_id, except_session_id)
            .await?;
        info!(user_id = %user_id, count, "Bulk session logout");
        Ok(count)
    }

    /// Changes a user's password after verifying the current one.
    ///
    /// Other active sessions deliberately stay valid; the count is logged
    /// so operators can see the exposure.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("User {user_id} not found")))?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::new(
                ErrorCode::InvalidCurrentPassword,
                "Current password is incorrect",
            ));
        }

        let report = self.validator.validate(new_password);
        if !report.is_valid() {
            return Err(password_weak(report.violations));
        }

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        if let Ok(stats) = self.sessions.stats_for_user(user_id).await {
            info!(
                user_id = %user_id,
                active_sessions = stats.active,
                "Password changed; other sessions remain valid"
            );
        }

        Ok(())
    }

    /// Verifies an access token and re-loads the user fresh from the
    /// store.
    ///
    /// A token is not trusted in isolation: the account state at use-time
    /// governs, not the state at issuance. Expired and malformed tokens
    /// fail with distinct codes; a valid token over a disabled or locked
    /// account fails with the account-state code.
    pub async fn verify_access_token(&self, token: &str) -> AppResult<VerifiedToken> {
        let claims = self.decoder.decode_access_token(token)?;

        let user = self
            .users
            .find_with_roles(claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::InvalidToken, "Token subject no longer exists")
            })?;

        if !user.user.active {
            return Err(AppError::account_disabled());
        }
        if user.user.locked {
            return Err(AppError::account_locked());
        }

        Ok(VerifiedToken { claims, user })
    }

    /// Deactivates all sessions past their expiry. Returns the count.
    pub async fn clean_expired_sessions(&self) -> AppResult<u64> {
        self.sessions.sweep_expired().await
    }

    /// Creates the bootstrap administrator account when configured and
    /// absent. Idempotent across restarts.
    pub async fn ensure_bootstrap_admin(&self, config: &AuthConfig) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            config.bootstrap_admin_email.as_deref(),
            config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        let email = normalize_email(email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(());
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                email: email.clone(),
                password_hash,
                display_name: Some("Administrator".to_string()),
                active: true,
            })
            .await?;

        let admin = self
            .roles
            .find_by_name(roles::ADMIN)
            .await?
            .ok_or_else(|| AppError::internal("Role catalog is not seeded"))?;
        self.users.assign_role(user.id, admin.id).await?;

        info!(user_id = %user.id, email = %email, "Bootstrap administrator created");
        Ok(())
    }

    /// Opens a session for an already-authenticated user and issues the
    /// token pair.
    async fn open_session(
        &self,
        user: UserWithRoles,
        context: &ClientContext,
    ) -> AppResult<AuthSession> {
        let IssuedSession {
            session,
            refresh_token,
        } = self
            .sessions
            .create_session(
                user.user.id,
                context.user_agent.as_deref(),
                context.ip_address.as_deref(),
            )
            .await?;

        let (access_token, access_expires_at) =
            self.encoder.generate_access_token(&user, session.id)?;

        Ok(AuthSession {
            session_id: session.id,
            tokens: AuthTokens {
                access_token,
                refresh_token,
                access_expires_at,
                refresh_expires_at: session.expires_at,
            },
            user,
        })
    }

    /// Loads a user with roles, treating absence as an internal fault —
    /// callers only pass IDs of users they just observed.
    async fn load_user_with_roles(&self, user_id: Uuid) -> AppResult<UserWithRoles> {
        self.users
            .find_with_roles(user_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("User {user_id} vanished mid-operation")))
    }
}

/// Lowercases and trims an email for storage and lookup.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Builds the PASSWORD_WEAK error carrying the complete violation list.
fn password_weak(violations: Vec<String>) -> AppError {
    AppError::new(
        ErrorCode::PasswordWeak,
        "Password does not meet the strength requirements",
    )
    .with_violations(
        violations
            .into_iter()
            .map(|v| FieldViolation::new("password", v))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_password_weak_carries_all_violations() {
        let err = password_weak(vec!["too short".into(), "needs a digit".into()]);
        assert_eq!(err.code, ErrorCode::PasswordWeak);
        assert_eq!(err.violations.len(), 2);
        assert!(err.violations.iter().all(|v| v.field == "password"));
    }
}
