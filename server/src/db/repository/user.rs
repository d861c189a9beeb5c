//! User Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, external_id, email, display_name, created_at, updated_at FROM user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_external_id(pool: &SqlitePool, external_id: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, external_id, email, display_name, created_at, updated_at FROM user WHERE external_id = ? LIMIT 1",
    )
    .bind(external_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Insert the user on first sign-in, refresh profile fields on every later one
pub async fn upsert_from_identity(
    pool: &SqlitePool,
    external_id: &str,
    email: Option<&str>,
    display_name: &str,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, external_id, email, display_name, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
         ON CONFLICT(external_id) DO UPDATE SET \
             email = excluded.email, \
             display_name = excluded.display_name, \
             updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(external_id)
    .bind(email)
    .bind(display_name)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_external_id(pool, external_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert user".into()))
}
