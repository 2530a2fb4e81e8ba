//! # authhub-service
//!
//! Request-scoped business services layered above the auth core: user
//! self-service, user administration, and session administration.

pub mod context;
pub mod session;
pub mod user;

pub use context::RequestContext;
pub use session::service::SessionService;
pub use user::admin::UserAdminService;
pub use user::service::UserService;
