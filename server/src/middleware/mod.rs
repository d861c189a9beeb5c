//! HTTP middleware: request logging and rate limiting

mod logging;
mod rate_limit;

pub use logging::logging_middleware;
pub use rate_limit::{RateLimiter, rate_limit_middleware};
