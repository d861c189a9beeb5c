//! Session Repository
//!
//! Opaque bearer tokens with server-side expiry. Expired rows are ignored
//! on lookup and purged opportunistically.

use super::{RepoError, RepoResult};
use shared::models::Session;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    token: &str,
    user_id: i64,
    ttl_millis: i64,
) -> RepoResult<Session> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO session (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(token)
    .bind(user_id)
    .bind(now)
    .bind(now + ttl_millis)
    .execute(pool)
    .await?;

    find_by_token(pool, token)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create session".into()))
}

/// Look up a session regardless of expiry
pub async fn find_by_token(pool: &SqlitePool, token: &str) -> RepoResult<Option<Session>> {
    let session = sqlx::query_as::<_, Session>(
        "SELECT token, user_id, created_at, expires_at FROM session WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

/// Look up a session, honoring expiry
pub async fn find_valid(pool: &SqlitePool, token: &str) -> RepoResult<Option<Session>> {
    let now = shared::util::now_millis();
    let session = sqlx::query_as::<_, Session>(
        "SELECT token, user_id, created_at, expires_at FROM session WHERE token = ? AND expires_at > ?",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(session)
}

pub async fn delete(pool: &SqlitePool, token: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM session WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove expired rows; returns how many were purged
pub async fn purge_expired(pool: &SqlitePool) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("DELETE FROM session WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
