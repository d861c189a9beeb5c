//! Shared test fixtures: in-memory database, seeded users, request helpers
#![allow(dead_code)]

use prolibr_server::auth::{JwtConfig, OAuthConfig};
use prolibr_server::core::{Config, ServerState};
use prolibr_server::db::DbService;
use prolibr_server::db::repository::user;
use shared::models::User;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Fresh in-memory database with migrations applied.
///
/// A single connection keeps every handle on the same memory database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("memory options")
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("open in-memory database");
    DbService::run_migrations(&pool)
        .await
        .expect("apply migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        database_path: ":memory:".into(),
        environment: "development".into(),
        frontend_url: "http://localhost:5173".into(),
        session_ttl_hours: 1,
        rate_limit_max_requests: 1000,
        rate_limit_window_secs: 60,
        jwt: JwtConfig {
            secret: "integration-test-secret-integration-test".into(),
            expiration_minutes: 60,
            issuer: "prolibr-server".into(),
            audience: "prolibr-web".into(),
        },
        oauth: OAuthConfig {
            authorize_url: "http://localhost:9/oauth/authorize".into(),
            token_url: "http://localhost:9/oauth/token".into(),
            userinfo_url: "http://localhost:9/oauth/userinfo".into(),
            client_id: "prolibr".into(),
            client_secret: "test".into(),
            redirect_url: "http://localhost:3000/auth/callback".into(),
            scope: "openid profile email".into(),
        },
    }
}

pub async fn test_state() -> ServerState {
    let pool = test_pool().await;
    ServerState::with_pool(test_config(), pool)
}

pub async fn seed_user(pool: &SqlitePool, name: &str) -> User {
    user::upsert_from_identity(
        pool,
        &format!("ext-{name}"),
        Some(&format!("{name}@example.com")),
        name,
    )
    .await
    .expect("seed user")
}
