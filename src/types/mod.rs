//! Shared types for the lessons API

pub mod error;

pub use error::{ApiError, Result};
