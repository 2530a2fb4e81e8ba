//! # authhub-api
//!
//! HTTP surface for AuthHub: routes, handlers, DTOs, the access gate
//! extractor, role/ownership guards, and the error-to-response mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
