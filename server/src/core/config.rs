use crate::auth::{JwtConfig, OAuthConfig};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | DATABASE_PATH | prolibr.db | SQLite database file |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | FRONTEND_URL | http://localhost:5173 | Where /auth/callback redirects the browser |
/// | SESSION_TTL_HOURS | 168 | Session lifetime |
/// | RATE_LIMIT_MAX_REQUESTS | 300 | Requests allowed per identity per window |
/// | RATE_LIMIT_WINDOW_SECS | 60 | Fixed-window length |
/// | JWT_SECRET / JWT_EXPIRATION_MINUTES / JWT_ISSUER / JWT_AUDIENCE | | see [`JwtConfig`] |
/// | OAUTH_* | | see [`OAuthConfig`] |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_path: String,
    /// development | staging | production
    pub environment: String,
    /// Browser is sent back here after the OAuth callback completes
    pub frontend_url: String,
    pub session_ttl_hours: i64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub jwt: JwtConfig,
    pub oauth: OAuthConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "prolibr.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(168),
            rate_limit_max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(60),
            jwt: JwtConfig::default(),
            oauth: OAuthConfig::from_env(),
        }
    }

    pub fn session_ttl_millis(&self) -> i64 {
        self.session_ttl_hours * 60 * 60 * 1000
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
