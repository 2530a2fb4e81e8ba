//! # authhub-database
//!
//! PostgreSQL access for AuthHub: connection pool management, migrations,
//! and the repositories for users, roles, and sessions. All durability,
//! uniqueness, and single-row atomicity guarantees live here; every row is
//! mapped into an `authhub-entity` record before it leaves this crate.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::role::RoleRepository;
pub use repositories::session::SessionRepository;
pub use repositories::user::UserRepository;
