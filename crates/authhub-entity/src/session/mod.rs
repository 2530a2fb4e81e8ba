//! Session entity.

pub mod device;
pub mod model;

pub use device::summarize_user_agent;
pub use model::{CreateSession, Session, SessionStats, SessionWithOwner};
