//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse for AppError` impl must live in the crate that
//! defines `AppError` (orphan rule), so it lives in
//! `authhub_core::error_response`. This module re-exports the pieces the
//! API layer refers to by their historical paths.

pub use authhub_core::error_response::{ApiErrorResponse, set_production_mode, status_for};
