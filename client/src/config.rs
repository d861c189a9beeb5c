//! Client configuration

/// Configuration for [`crate::ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL, e.g. `http://localhost:3000`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Optional bearer token (JWT or session token)
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
