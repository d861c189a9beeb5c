//! User Model

use serde::{Deserialize, Serialize};

/// User entity, provisioned on first OAuth sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    /// Subject identifier assigned by the identity provider
    pub external_id: String,
    pub email: Option<String>,
    pub display_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public profile view returned by `/api/user/profile` and `/api/auth/validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: Option<String>,
    pub display_name: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}
