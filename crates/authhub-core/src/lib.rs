//! # authhub-core
//!
//! Core crate for AuthHub. Contains configuration schemas, pagination and
//! duration types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other AuthHub crates.

pub mod config;
pub mod error;
#[cfg(feature = "axum")]
pub mod error_response;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorCode, FieldViolation};
pub use result::AppResult;
