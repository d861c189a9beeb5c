//! Category Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate, CategoryWithCount};
use sqlx::SqlitePool;

const CATEGORY_WITH_COUNT_SELECT: &str = "SELECT c.id, c.name, c.description, c.color, c.icon, c.sort_order, c.created_at, c.updated_at, (SELECT COUNT(*) FROM prompt p WHERE p.category_id = c.id) AS prompt_count FROM category c";

/// Find all categories with their dependent prompt counts
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CategoryWithCount>> {
    let sql = format!("{} ORDER BY c.sort_order, c.name", CATEGORY_WITH_COUNT_SELECT);
    let rows = sqlx::query_as::<_, CategoryWithCount>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CategoryWithCount>> {
    let sql = format!("{} WHERE c.id = ?", CATEGORY_WITH_COUNT_SELECT);
    let row = sqlx::query_as::<_, CategoryWithCount>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, color, icon, sort_order, created_at, updated_at FROM category WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<CategoryWithCount> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::CategoryNameExists,
            format!("Category '{}' already exists", data.name),
        ));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO category (id, name, description, color, icon, sort_order, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.color)
    .bind(&data.icon)
    .bind(data.sort_order.unwrap_or(0))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CategoryUpdate,
) -> RepoResult<CategoryWithCount> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    // Check duplicate name if changing
    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(pool, new_name).await?.is_some()
    {
        return Err(RepoError::Business(
            ErrorCode::CategoryNameExists,
            format!("Category '{new_name}' already exists"),
        ));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), description = COALESCE(?2, description), color = COALESCE(?3, color), icon = COALESCE(?4, icon), sort_order = COALESCE(?5, sort_order), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.color)
    .bind(&data.icon)
    .bind(data.sort_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Hard delete a category; rejected while prompts still reference it
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    if existing.prompt_count > 0 {
        return Err(RepoError::Business(
            ErrorCode::CategoryHasPrompts,
            format!(
                "Category '{}' still has {} prompt(s) assigned to it",
                existing.name, existing.prompt_count
            ),
        ));
    }

    sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(true)
}
