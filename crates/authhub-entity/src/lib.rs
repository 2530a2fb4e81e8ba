//! # authhub-entity
//!
//! Typed domain records for AuthHub. Persistence rows are mapped into these
//! structs at the repository boundary so that no other crate ever depends on
//! the database client's native row shape.

pub mod role;
pub mod session;
pub mod user;

pub use role::{Role, roles};
pub use session::{CreateSession, Session, SessionStats, SessionWithOwner};
pub use user::{CreateUser, UpdateUser, User, UserWithRoles};
