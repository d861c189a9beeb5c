//! Analytics API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::execution;
use shared::error::AppResult;
use shared::models::UserAnalytics;

/// GET /api/analytics/user - aggregates for the current user, computed on read
pub async fn user_analytics(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserAnalytics>> {
    let analytics = execution::user_analytics(&state.pool, current_user.id).await?;
    Ok(Json(analytics))
}
