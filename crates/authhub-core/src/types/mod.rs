//! Shared value types used across AuthHub crates.

pub mod duration;
pub mod pagination;

pub use duration::{compute_expiry, parse_duration};
pub use pagination::{PageRequest, PageResponse};
