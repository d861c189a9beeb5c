//! Execution Repository
//!
//! Append-only: rows are inserted and read, never updated or deleted.
//! Deleting a prompt cascades its history away at the schema level.

use super::{RepoError, RepoResult};
use shared::models::{Execution, ExecutionCreate, UserAnalytics};
use sqlx::SqlitePool;

const EXECUTION_SELECT: &str = "SELECT id, prompt_id, user_id, ai_model_used, input_variables, response_quality_rating, execution_time_ms, tokens_used, cost_estimate, was_successful, error_message, created_at FROM execution";

/// Insert an execution and bump the prompt's usage counter in one transaction
pub async fn log(
    pool: &SqlitePool,
    prompt_id: i64,
    user_id: i64,
    data: &ExecutionCreate,
) -> RepoResult<Execution> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let input_variables = data
        .input_variables
        .as_ref()
        .map(|m| serde_json::to_string(m).unwrap_or_else(|_| "{}".to_string()))
        .unwrap_or_else(|| "{}".to_string());

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO execution (id, prompt_id, user_id, ai_model_used, input_variables, response_quality_rating, execution_time_ms, tokens_used, cost_estimate, was_successful, error_message, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(id)
    .bind(prompt_id)
    .bind(user_id)
    .bind(&data.ai_model_used)
    .bind(&input_variables)
    .bind(data.response_quality_rating)
    .bind(data.execution_time_ms.unwrap_or(0))
    .bind(data.tokens_used.unwrap_or(0))
    .bind(data.cost_estimate.unwrap_or(0.0))
    .bind(data.was_successful.unwrap_or(true))
    .bind(&data.error_message)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE prompt SET usage_count = usage_count + 1 WHERE id = ?")
        .bind(prompt_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to log execution".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Execution>> {
    let sql = format!("{} WHERE id = ?", EXECUTION_SELECT);
    let row = sqlx::query_as::<_, Execution>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Execution history of one prompt, newest first
pub async fn find_by_prompt(
    pool: &SqlitePool,
    prompt_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Execution>> {
    let sql = format!(
        "{} WHERE prompt_id = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
        EXECUTION_SELECT
    );
    let rows = sqlx::query_as::<_, Execution>(&sql)
        .bind(prompt_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Per-user aggregates, computed on read
pub async fn user_analytics(pool: &SqlitePool, user_id: i64) -> RepoResult<UserAnalytics> {
    let week_ago = shared::util::now_millis() - 7 * 24 * 60 * 60 * 1000;
    let analytics = sqlx::query_as::<_, UserAnalytics>(
        "SELECT \
            (SELECT COUNT(*) FROM prompt WHERE user_id = ?1) AS total_prompts, \
            (SELECT COUNT(*) FROM execution WHERE user_id = ?1) AS total_executions, \
            (SELECT AVG(response_quality_rating) FROM execution WHERE user_id = ?1 AND response_quality_rating IS NOT NULL) AS avg_quality_rating, \
            (SELECT COALESCE(SUM(tokens_used), 0) FROM execution WHERE user_id = ?1) AS total_tokens_used, \
            (SELECT COALESCE(SUM(cost_estimate), 0.0) FROM execution WHERE user_id = ?1) AS total_cost_estimate, \
            (SELECT COUNT(*) FROM execution WHERE user_id = ?1 AND created_at >= ?2) AS executions_this_week",
    )
    .bind(user_id)
    .bind(week_ago)
    .fetch_one(pool)
    .await?;
    Ok(analytics)
}
