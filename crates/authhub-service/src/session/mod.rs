//! Session administration.

pub mod service;
