//! Rate limiting middleware
//!
//! Fixed-window counters per identity (bearer token when present, else the
//! forwarded client address). Exceeding the budget yields 429 with a
//! Retry-After header carrying the seconds until the window resets.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::core::ServerState;
use shared::AppError;

/// Fixed-window request counter
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, Window>,
    max_requests: u32,
    window_millis: i64,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: i64,
    count: u32,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            buckets: DashMap::new(),
            max_requests,
            window_millis: (window_secs as i64) * 1000,
        }
    }

    /// Record one request for `key`; `Err(retry_after_secs)` when over budget
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let now = shared::util::now_millis();
        let mut entry = self
            .buckets
            .entry(key.to_string())
            .or_insert(Window { started_at: now, count: 0 });

        if now - entry.started_at >= self.window_millis {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        if entry.count > self.max_requests {
            let elapsed = now - entry.started_at;
            let retry_after = (self.window_millis - elapsed).max(0) as u64 / 1000 + 1;
            return Err(retry_after);
        }
        Ok(())
    }

    /// Drop windows that ended long ago so the map stays bounded
    pub fn sweep(&self) {
        let now = shared::util::now_millis();
        self.buckets
            .retain(|_, w| now - w.started_at < self.window_millis * 2);
    }
}

/// Per-request gate over [`RateLimiter`]
pub async fn rate_limit_middleware(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
        })
        .unwrap_or("anonymous")
        .to_string();

    if let Err(retry_after) = state.rate_limiter.check(&key) {
        tracing::warn!(key_prefix = %&key[..key.len().min(16)], "Rate limit exceeded");
        return Err(AppError::rate_limited(retry_after));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_budget_then_rejects() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.check("user-a").is_ok());
        assert!(limiter.check("user-a").is_ok());
        assert!(limiter.check("user-a").is_ok());
        let retry = limiter.check("user-a").unwrap_err();
        assert!(retry >= 1 && retry <= 61);
    }

    #[test]
    fn identities_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check("user-a").is_ok());
        assert!(limiter.check("user-b").is_ok());
        assert!(limiter.check("user-a").is_err());
        assert!(limiter.check("user-b").is_err());
    }

    #[test]
    fn sweep_keeps_active_windows() {
        let limiter = RateLimiter::new(10, 60);
        limiter.check("user-a").unwrap();
        limiter.sweep();
        // Active window survives the sweep, so the count continues
        limiter.check("user-a").unwrap();
        assert_eq!(limiter.buckets.get("user-a").unwrap().count, 2);
    }
}
