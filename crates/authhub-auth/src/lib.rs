//! # authhub-auth
//!
//! Credential handling and the session lifecycle core for AuthHub.
//!
//! ## Modules
//!
//! - `jwt` — access token creation and validation
//! - `password` — Argon2id hashing and strength policy enforcement
//! - `refresh` — opaque refresh token generation and at-rest digests
//! - `session` — session store (validity predicate, rotation, sweeps)
//! - `service` — the authentication state machine: register, login,
//!   refresh, logout, change-password, token verification

pub mod jwt;
pub mod password;
pub mod refresh;
pub mod service;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator, StrengthReport};
pub use service::{AuthService, AuthSession, AuthTokens, ClientContext, LogoutOutcome};
pub use session::{IssuedSession, SessionCleanup, SessionStore};
