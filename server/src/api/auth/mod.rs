//! Auth API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        // OAuth proxy (public, outside /api)
        .route("/auth/login", get(handler::login))
        .route("/auth/callback", get(handler::callback))
        .route("/auth/logout", get(handler::logout))
        // Authenticated
        .route("/api/auth/validate", get(handler::validate))
        .route("/api/user/profile", get(handler::profile))
}
