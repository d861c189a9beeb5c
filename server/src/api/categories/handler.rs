//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation;
use shared::AppError;
use shared::error::AppResult;
use shared::models::{CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryWithCount};

/// GET /api/categories - all categories with prompt counts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<CategoryListResponse>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(CategoryListResponse { categories }))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryWithCount>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id}")))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<CategoryWithCount>)> {
    validation::validate_category_create(&payload)?;
    let category = category::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<CategoryWithCount>> {
    validation::validate_category_update(&payload)?;
    let category = category::update(&state.pool, id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
///
/// The zero-dependent-prompts invariant is enforced here, not only in the
/// UI: a category that still has prompts is rejected with a conflict.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = category::delete(&state.pool, id).await?;
    Ok(Json(result))
}
