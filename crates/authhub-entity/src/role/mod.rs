//! Role entity.

pub mod model;

pub use model::{DEFAULT_ROLES, Role, roles};
