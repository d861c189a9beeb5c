//! Authentication middleware
//!
//! Bearer credentials are tried two ways, in order: first as a first-party
//! JWT (full signature/issuer/audience verification), then as a server-side
//! session token with an expiry check. Success injects [`CurrentUser`] into
//! request extensions; everything else is 401.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::{session, user};
use crate::security_log;
use shared::AppError;

/// Authentication gate for `/api/` routes
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths (the OAuth redirect endpoints, `/health`)
/// - `/api/health/database` (public probe)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/health/database" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate_token(&state, token).await.map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        e
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Resolve a bearer token to a user: verified JWT first, then session lookup
pub async fn authenticate_token(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let jwt_service = state.jwt_service();

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            return CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")));
        }
        Err(crate::auth::JwtError::ExpiredToken) => {
            // A well-formed but stale JWT is reported as expired rather than
            // falling through to an always-failing session lookup
            return Err(AppError::token_expired());
        }
        Err(_) => {}
    }

    // Fallback: opaque session token
    let session = session::find_valid(&state.pool, token)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::unauthorized)?;

    let user = user::find_by_id(&state.pool, session.user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::unauthorized)?;

    Ok(CurrentUser {
        id: user.id,
        display_name: user.display_name,
        email: user.email,
    })
}
