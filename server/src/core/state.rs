use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, OAuthService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::session;
use crate::middleware::RateLimiter;

/// Server state — shared handles for every request
///
/// Cloning is shallow: the pool and services are reference-counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub oauth: Arc<OAuthService>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl ServerState {
    /// Initialize state: open the database, run migrations, wire services
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or migrated.
    pub async fn initialize(config: &Config) -> Self {
        let db_service = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let oauth = Arc::new(OAuthService::new(config.oauth.clone()));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window_secs,
        ));

        Self {
            config: config.clone(),
            pool: db_service.pool,
            jwt_service,
            oauth,
            rate_limiter,
        }
    }

    /// Build state over an existing pool (tests)
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let oauth = Arc::new(OAuthService::new(config.oauth.clone()));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window_secs,
        ));
        Self {
            config,
            pool,
            jwt_service,
            oauth,
            rate_limiter,
        }
    }

    /// Start background tasks; must be called before `Server::run()`
    ///
    /// - hourly purge of expired sessions
    pub async fn start_background_tasks(&self) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match session::purge_expired(&pool).await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!(purged = n, "Expired sessions purged"),
                    Err(e) => tracing::warn!(error = %e, "Session purge failed"),
                }
            }
        });
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
