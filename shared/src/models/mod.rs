//! Data models
//!
//! Shared between the server and client crates (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are UTC millis.

pub mod category;
pub mod execution;
pub mod prompt;
pub mod session;
pub mod tag;
pub mod user;

// Re-exports
pub use category::*;
pub use execution::*;
pub use prompt::*;
pub use session::*;
pub use tag::*;
pub use user::*;
