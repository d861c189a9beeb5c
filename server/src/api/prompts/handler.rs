//! Prompt API Handlers
//!
//! Query parameters arrive as raw strings so malformed values become our
//! 400 with field details instead of a framework rejection; no filter is
//! ever partially applied.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::prompt::PromptFilter;
use crate::db::repository::{execution, prompt, tag};
use crate::utils::validation;
use shared::AppError;
use shared::error::AppResult;
use shared::models::{
    ExecutionCreate, ExecutionListResponse, PromptCreate, PromptPage, PromptUpdate,
    PromptWithMeta, Visibility,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub visibility: Option<String>,
}

/// Parsed and validated listing parameters
struct ListParams {
    page: i64,
    limit: i64,
    filter: PromptFilter,
}

/// The UI sends unset filters as empty strings; treat those as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_list_query(owner_id: i64, query: ListQuery) -> AppResult<ListParams> {
    let page = match non_empty(query.page) {
        None => 1,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| {
                AppError::validation("page must be a positive integer").with_detail("field", "page")
            })?,
    };

    let limit = match non_empty(query.limit) {
        None => DEFAULT_PAGE_SIZE,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .ok_or_else(|| {
                AppError::validation(format!("limit must be between 1 and {MAX_PAGE_SIZE}"))
                    .with_detail("field", "limit")
            })?,
    };

    let category_id = match non_empty(query.category) {
        None => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| {
            AppError::validation("category must be a numeric id").with_detail("field", "category")
        })?),
    };

    let visibility = match non_empty(query.visibility) {
        None => None,
        Some(raw) => Some(raw.parse::<Visibility>().map_err(|_| {
            AppError::validation("visibility must be one of private, public, shared")
                .with_detail("field", "visibility")
        })?),
    };

    Ok(ListParams {
        page,
        limit,
        filter: PromptFilter {
            owner_id,
            category_id,
            search: non_empty(query.search),
            visibility,
        },
    })
}

/// GET /api/prompts - owner-scoped page with optional filters
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PromptPage>> {
    let params = parse_list_query(current_user.id, query)?;

    let offset = (params.page - 1) * params.limit;
    let prompts = prompt::find_page(&state.pool, &params.filter, params.limit, offset).await?;
    let total = prompt::count(&state.pool, &params.filter).await?;
    let total_pages = if total == 0 {
        0
    } else {
        (total + params.limit - 1) / params.limit
    };

    Ok(Json(PromptPage {
        prompts,
        total,
        page: params.page,
        limit: params.limit,
        total_pages,
    }))
}

/// Visibility gate for reads: owner always, others only when public
fn ensure_readable(user: &CurrentUser, prompt: &PromptWithMeta) -> AppResult<()> {
    if prompt.prompt.user_id == user.id || prompt.prompt.visibility == Visibility::Public {
        Ok(())
    } else {
        Err(AppError::forbidden("This prompt is not public"))
    }
}

/// GET /api/prompts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<PromptWithMeta>> {
    let prompt = prompt::find_with_meta(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Prompt {id}")))?;
    ensure_readable(&current_user, &prompt)?;
    Ok(Json(prompt))
}

/// POST /api/prompts - create with tags, transactionally
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PromptCreate>,
) -> AppResult<(StatusCode, Json<PromptWithMeta>)> {
    validation::validate_prompt_create(&payload)?;
    let tags = tag::normalize(&payload.tags);
    let created = prompt::create(&state.pool, current_user.id, &payload, &tags).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/prompts/:id - partial update, optional full tag replacement
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PromptUpdate>,
) -> AppResult<Json<PromptWithMeta>> {
    validation::validate_prompt_update(&payload)?;
    let tags = payload.tags.as_deref().map(tag::normalize);
    let updated =
        prompt::update(&state.pool, id, current_user.id, &payload, tags.as_deref()).await?;
    Ok(Json(updated))
}

/// DELETE /api/prompts/:id - owner only, hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = prompt::delete(&state.pool, id, current_user.id).await?;
    Ok(Json(result))
}

/// POST /api/prompts/:id/execute - append an execution record
pub async fn execute(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ExecutionCreate>,
) -> AppResult<(StatusCode, Json<shared::models::Execution>)> {
    validation::validate_execution_create(&payload)?;

    let prompt = prompt::find_with_meta(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Prompt {id}")))?;
    ensure_readable(&current_user, &prompt)?;

    let logged = execution::log(&state.pool, id, current_user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(logged)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ExecutionListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/prompts/:id/executions - history, newest first
pub async fn list_executions(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(query): Query<ExecutionListQuery>,
) -> AppResult<Json<ExecutionListResponse>> {
    let limit = match non_empty(query.limit) {
        None => DEFAULT_PAGE_SIZE,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
            .ok_or_else(|| {
                AppError::validation(format!("limit must be between 1 and {MAX_PAGE_SIZE}"))
                    .with_detail("field", "limit")
            })?,
    };
    let offset = match non_empty(query.offset) {
        None => 0,
        Some(raw) => raw.parse::<i64>().ok().filter(|o| *o >= 0).ok_or_else(|| {
            AppError::validation("offset must be a non-negative integer")
                .with_detail("field", "offset")
        })?,
    };

    let prompt = prompt::find_with_meta(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Prompt {id}")))?;
    ensure_readable(&current_user, &prompt)?;

    let executions = execution::find_by_prompt(&state.pool, id, limit, offset).await?;
    Ok(Json(ExecutionListResponse { executions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let params = parse_list_query(1, ListQuery::default()).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_SIZE);
        assert!(params.filter.category_id.is_none());
        assert!(params.filter.search.is_none());
        assert!(params.filter.visibility.is_none());
    }

    #[test]
    fn list_query_empty_strings_are_absent_filters() {
        let query = ListQuery {
            page: Some("".into()),
            limit: Some("".into()),
            category: Some("".into()),
            search: Some("".into()),
            visibility: Some("".into()),
        };
        let params = parse_list_query(1, query).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_SIZE);
        assert!(params.filter.visibility.is_none());
    }

    #[test]
    fn list_query_rejects_bad_page() {
        for bad in ["0", "-3", "abc", "1.5"] {
            let query = ListQuery {
                page: Some(bad.into()),
                ..Default::default()
            };
            assert!(parse_list_query(1, query).is_err(), "page={bad}");
        }
    }

    #[test]
    fn list_query_rejects_out_of_range_limit() {
        for bad in ["0", "101", "-1", "ten"] {
            let query = ListQuery {
                limit: Some(bad.into()),
                ..Default::default()
            };
            assert!(parse_list_query(1, query).is_err(), "limit={bad}");
        }
    }

    #[test]
    fn list_query_rejects_unknown_visibility() {
        let query = ListQuery {
            visibility: Some("hidden".into()),
            ..Default::default()
        };
        assert!(parse_list_query(1, query).is_err());
    }

    #[test]
    fn list_query_parses_all_filters() {
        let query = ListQuery {
            page: Some("2".into()),
            limit: Some("50".into()),
            category: Some("12345".into()),
            search: Some("rust".into()),
            visibility: Some("public".into()),
        };
        let params = parse_list_query(9, query).unwrap();
        assert_eq!(params.page, 2);
        assert_eq!(params.limit, 50);
        assert_eq!(params.filter.owner_id, 9);
        assert_eq!(params.filter.category_id, Some(12345));
        assert_eq!(params.filter.search.as_deref(), Some("rust"));
        assert_eq!(params.filter.visibility, Some(Visibility::Public));
    }
}
