//! Execution Model
//!
//! Executions are append-only history: once logged they are never
//! updated or deleted through the API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A logged run of a prompt against an AI model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Execution {
    pub id: i64,
    pub prompt_id: i64,
    pub user_id: i64,
    pub ai_model_used: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub input_variables: Map<String, Value>,
    /// 1-5, optional
    pub response_quality_rating: Option<i64>,
    pub execution_time_ms: i64,
    pub tokens_used: i64,
    pub cost_estimate: f64,
    pub was_successful: bool,
    pub error_message: Option<String>,
    pub created_at: i64,
}

/// Log execution payload (`POST /api/prompts/:id/execute`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionCreate {
    pub ai_model_used: String,
    pub input_variables: Option<Map<String, Value>>,
    pub response_quality_rating: Option<i64>,
    pub execution_time_ms: Option<i64>,
    pub tokens_used: Option<i64>,
    pub cost_estimate: Option<f64>,
    pub was_successful: Option<bool>,
    pub error_message: Option<String>,
}

/// Response envelope for `GET /api/prompts/:id/executions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionListResponse {
    pub executions: Vec<Execution>,
}

/// Per-user aggregates computed on read (`GET /api/analytics/user`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserAnalytics {
    pub total_prompts: i64,
    pub total_executions: i64,
    pub avg_quality_rating: Option<f64>,
    pub total_tokens_used: i64,
    pub total_cost_estimate: f64,
    pub executions_this_week: i64,
}
