//! Session Model

use serde::{Deserialize, Serialize};

/// Server-side session record backing opaque bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at <= now_millis
    }
}
