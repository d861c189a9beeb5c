//! Auth API Handlers
//!
//! Proxies the OAuth dance: `/auth/login` sends the browser to the identity
//! provider, `/auth/callback` turns the returned code into first-party
//! credentials (a session row plus a JWT) and bounces back to the frontend.

use axum::{
    Json,
    extract::{Extension, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{session, user};
use crate::security_log;
use shared::AppError;
use shared::error::AppResult;
use shared::models::UserInfo;

/// GET /auth/login - redirect to the identity provider
pub async fn login(State(state): State<ServerState>) -> AppResult<Redirect> {
    let url = state.oauth.authorize_redirect()?;
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// GET /auth/callback - complete the OAuth dance
///
/// Exchanges the code, provisions the user row, creates a session and a
/// JWT, then redirects the browser to the frontend callback page with both
/// credentials in the query string.
pub async fn callback(
    State(state): State<ServerState>,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Redirect> {
    state.oauth.take_state(&query.state)?;

    let identity = state.oauth.exchange_code(&query.code).await?;
    let display_name = identity
        .name
        .clone()
        .or_else(|| identity.email.clone())
        .unwrap_or_else(|| identity.sub.clone());

    let user = user::upsert_from_identity(
        &state.pool,
        &identity.sub,
        identity.email.as_deref(),
        &display_name,
    )
    .await?;

    let token = crate::auth::generate_session_token()?;
    session::create(&state.pool, &token, user.id, state.config.session_ttl_millis()).await?;

    let jwt = state
        .jwt_service
        .generate_token(user.id, &user.display_name, user.email.as_deref())
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    security_log!(
        "INFO",
        "login_succeeded",
        user_id = user.id,
        display_name = user.display_name.clone()
    );

    let redirect = format!(
        "{}/auth/callback?session_token={}&token={}",
        state.config.frontend_url.trim_end_matches('/'),
        token,
        jwt
    );
    Ok(Redirect::temporary(&redirect))
}

#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub session: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// GET /auth/logout?session= - invalidate a session token
pub async fn logout(
    State(state): State<ServerState>,
    Query(query): Query<LogoutQuery>,
) -> AppResult<Json<LogoutResponse>> {
    let success = match query.session {
        Some(ref token) => session::delete(&state.pool, token).await?,
        None => false,
    };
    Ok(Json(LogoutResponse { success }))
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub user: UserInfo,
}

/// GET /api/auth/validate - check the presented credential
pub async fn validate(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ValidateResponse>> {
    Ok(Json(ValidateResponse {
        valid: true,
        user: UserInfo {
            id: current_user.id,
            email: current_user.email,
            display_name: current_user.display_name,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserInfo,
}

/// GET /api/user/profile - current user profile (fresh from the DB)
pub async fn profile(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    let user = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(ProfileResponse { user: user.into() }))
}
