//! Typed HTTP client for the ProLibr API
//!
//! Wraps the REST surface with bearer-token attachment and error
//! normalization so consumers deal in models and [`ClientError`] values
//! instead of raw responses.

mod config;
mod error;
mod http;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, PromptListQuery};

// Re-export the model types callers exchange with the API
pub use shared::models;
