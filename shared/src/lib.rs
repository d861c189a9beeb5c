//! Shared types for the ProLibr prompt library
//!
//! Common types used across the server and client crates: data models,
//! the unified error system, and utility helpers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
