//! Prompt Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Access scope of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum Visibility {
    Private,
    Public,
    Shared,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Public => "public",
            Self::Shared => "shared",
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Private
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown visibility value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVisibility(pub String);

impl fmt::Display for InvalidVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid visibility: {}", self.0)
    }
}

impl std::error::Error for InvalidVisibility {}

impl FromStr for Visibility {
    type Err = InvalidVisibility;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public" => Ok(Self::Public),
            "shared" => Ok(Self::Shared),
            other => Err(InvalidVisibility(other.to_string())),
        }
    }
}

/// Prompt entity (row shape, without joined metadata)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Prompt {
    pub id: i64,
    /// Owner; immutable after creation
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category_id: Option<i64>,
    pub visibility: Visibility,
    pub is_template: bool,
    /// Placeholder name -> default value map for template prompts
    #[cfg_attr(feature = "db", sqlx(json))]
    pub template_variables: Map<String, Value>,
    pub target_ai_model: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub model_parameters: Map<String, Value>,
    pub usage_count: i64,
    /// Incremented on every successful update
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Prompt joined with category metadata and aggregated tag names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptWithMeta {
    #[serde(flatten)]
    pub prompt: Prompt,
    pub category_name: Option<String>,
    pub category_color: Option<String>,
    pub tags: Vec<String>,
}

/// Create prompt payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptCreate {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub category_id: Option<i64>,
    pub visibility: Option<Visibility>,
    pub is_template: Option<bool>,
    pub template_variables: Option<Map<String, Value>>,
    pub target_ai_model: Option<String>,
    pub model_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update prompt payload (partial; omitted fields keep prior values,
/// a supplied `tags` list replaces the whole tag set)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub visibility: Option<Visibility>,
    pub is_template: Option<bool>,
    pub template_variables: Option<Map<String, Value>>,
    pub target_ai_model: Option<String>,
    pub model_parameters: Option<Map<String, Value>>,
    pub tags: Option<Vec<String>>,
}

/// One page of prompts, as returned by `GET /api/prompts`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPage {
    pub prompts: Vec<PromptWithMeta>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}
