//! Tag Model

use serde::{Deserialize, Serialize};

/// Tag entity; names are stored lower-cased and unique
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tag {
    pub id: i64,
    pub name: String,
}
