//! HTTP client for the ProLibr API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{
    CategoryCreate, CategoryListResponse, CategoryUpdate, CategoryWithCount, Execution,
    ExecutionCreate, ExecutionListResponse, PromptCreate, PromptPage, PromptUpdate,
    PromptWithMeta, UserAnalytics,
};

/// Filters for the prompt listing; unset fields are simply not sent
#[derive(Debug, Clone, Default)]
pub struct PromptListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<i64>,
    pub search: Option<String>,
    pub visibility: Option<String>,
}

impl PromptListQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref visibility) = self.visibility {
            pairs.push(("visibility", visibility.clone()));
        }
        pairs
    }
}

/// HTTP client for making network requests to the ProLibr server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.put(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.delete(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Normalize an HTTP response into a typed result
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(ClientError::RateLimited { retry_after });
            }

            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::CONFLICT => Err(ClientError::Conflict(text)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    Err(ClientError::Validation(text))
                }
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    // ========== Category API ==========

    pub async fn categories(&self) -> ClientResult<CategoryListResponse> {
        self.get("api/categories", &[]).await
    }

    pub async fn create_category(&self, data: &CategoryCreate) -> ClientResult<CategoryWithCount> {
        self.post("api/categories", data).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        data: &CategoryUpdate,
    ) -> ClientResult<CategoryWithCount> {
        self.put(&format!("api/categories/{id}"), data).await
    }

    pub async fn delete_category(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("api/categories/{id}")).await
    }

    // ========== Prompt API ==========

    pub async fn prompts(&self, query: &PromptListQuery) -> ClientResult<PromptPage> {
        self.get("api/prompts", &query.to_pairs()).await
    }

    pub async fn prompt(&self, id: i64) -> ClientResult<PromptWithMeta> {
        self.get(&format!("api/prompts/{id}"), &[]).await
    }

    pub async fn create_prompt(&self, data: &PromptCreate) -> ClientResult<PromptWithMeta> {
        self.post("api/prompts", data).await
    }

    pub async fn update_prompt(
        &self,
        id: i64,
        data: &PromptUpdate,
    ) -> ClientResult<PromptWithMeta> {
        self.put(&format!("api/prompts/{id}"), data).await
    }

    pub async fn delete_prompt(&self, id: i64) -> ClientResult<bool> {
        self.delete(&format!("api/prompts/{id}")).await
    }

    // ========== Execution API ==========

    pub async fn execute_prompt(
        &self,
        id: i64,
        data: &ExecutionCreate,
    ) -> ClientResult<Execution> {
        self.post(&format!("api/prompts/{id}/execute"), data).await
    }

    pub async fn executions(
        &self,
        prompt_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> ClientResult<ExecutionListResponse> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        self.get(&format!("api/prompts/{prompt_id}/executions"), &query)
            .await
    }

    // ========== Analytics API ==========

    pub async fn user_analytics(&self) -> ClientResult<UserAnalytics> {
        self.get("api/analytics/user", &[]).await
    }

    // ========== Auth API ==========

    /// Check the current credential; Err(Unauthorized) when stale
    pub async fn validate(&self) -> ClientResult<serde_json::Value> {
        self.get("api/auth/validate", &[]).await
    }

    pub async fn profile(&self) -> ClientResult<serde_json::Value> {
        self.get("api/user/profile", &[]).await
    }

    /// Invalidate a session token server-side
    pub async fn logout(&self, session_token: &str) -> ClientResult<serde_json::Value> {
        self.get("auth/logout", &[("session", session_token.to_string())])
            .await
    }
}
