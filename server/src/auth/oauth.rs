//! OAuth proxy
//!
//! The server fronts the identity provider: it builds the authorize
//! redirect, validates the returned `state`, exchanges the code for an
//! access token and reads the userinfo endpoint. The browser never talks
//! to the provider's token endpoint directly.

use dashmap::DashMap;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

/// How long an issued `state` parameter stays valid
const STATE_TTL_MILLIS: i64 = 10 * 60 * 1000;

/// OAuth client configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scope: String,
}

impl OAuthConfig {
    pub fn from_env() -> Self {
        Self {
            authorize_url: std::env::var("OAUTH_AUTHORIZE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/oauth/authorize".into()),
            token_url: std::env::var("OAUTH_TOKEN_URL")
                .unwrap_or_else(|_| "http://localhost:8080/oauth/token".into()),
            userinfo_url: std::env::var("OAUTH_USERINFO_URL")
                .unwrap_or_else(|_| "http://localhost:8080/oauth/userinfo".into()),
            client_id: std::env::var("OAUTH_CLIENT_ID").unwrap_or_else(|_| "prolibr".into()),
            client_secret: std::env::var("OAUTH_CLIENT_SECRET").unwrap_or_default(),
            redirect_url: std::env::var("OAUTH_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:3000/auth/callback".into()),
            scope: std::env::var("OAUTH_SCOPE")
                .unwrap_or_else(|_| "openid profile email".into()),
        }
    }
}

/// Identity claims read from the provider's userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth proxy service
#[derive(Debug, Clone)]
pub struct OAuthService {
    config: OAuthConfig,
    http: reqwest::Client,
    /// Issued state parameters -> issue time (millis)
    states: std::sync::Arc<DashMap<String, i64>>,
}

impl OAuthService {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            states: std::sync::Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the authorize redirect URL, minting and caching a fresh state
    pub fn authorize_redirect(&self) -> Result<String, AppError> {
        let state = uuid::Uuid::new_v4().to_string();
        self.states.insert(state.clone(), shared::util::now_millis());
        self.sweep_states();

        let url = reqwest::Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| AppError::internal(format!("Invalid authorize URL: {e}")))?;

        Ok(url.to_string())
    }

    /// Validate and consume a returned state parameter
    pub fn take_state(&self, state: &str) -> Result<(), AppError> {
        let now = shared::util::now_millis();
        match self.states.remove(state) {
            Some((_, issued_at)) if now - issued_at <= STATE_TTL_MILLIS => Ok(()),
            _ => Err(AppError::new(ErrorCode::OAuthStateMismatch)),
        }
    }

    fn sweep_states(&self) {
        let now = shared::util::now_millis();
        self.states
            .retain(|_, issued_at| now - *issued_at <= STATE_TTL_MILLIS);
    }

    /// Exchange an authorization code for identity claims
    pub async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, AppError> {
        let token: TokenResponse = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| exchange_error(format!("Token request failed: {e}")))?
            .error_for_status()
            .map_err(|e| exchange_error(format!("Token endpoint rejected the code: {e}")))?
            .json()
            .await
            .map_err(|e| exchange_error(format!("Malformed token response: {e}")))?;

        let claims: IdentityClaims = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| exchange_error(format!("Userinfo request failed: {e}")))?
            .error_for_status()
            .map_err(|e| exchange_error(format!("Userinfo endpoint rejected the token: {e}")))?
            .json()
            .await
            .map_err(|e| exchange_error(format!("Malformed userinfo response: {e}")))?;

        Ok(claims)
    }
}

fn exchange_error(detail: String) -> AppError {
    tracing::warn!(target: "security", error = %detail, "OAuth code exchange failed");
    AppError::new(ErrorCode::OAuthExchangeFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> OAuthService {
        OAuthService::new(OAuthConfig {
            authorize_url: "https://idp.example.com/oauth/authorize".into(),
            token_url: "https://idp.example.com/oauth/token".into(),
            userinfo_url: "https://idp.example.com/oauth/userinfo".into(),
            client_id: "prolibr".into(),
            client_secret: "secret".into(),
            redirect_url: "http://localhost:3000/auth/callback".into(),
            scope: "openid profile email".into(),
        })
    }

    #[test]
    fn authorize_redirect_carries_state_and_client_id() {
        let service = test_service();
        let url = service.authorize_redirect().unwrap();
        assert!(url.starts_with("https://idp.example.com/oauth/authorize?"));
        assert!(url.contains("client_id=prolibr"));
        assert!(url.contains("state="));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn state_is_single_use() {
        let service = test_service();
        let url = service.authorize_redirect().unwrap();
        let state = reqwest::Url::parse(&url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.to_string())
            .unwrap();

        assert!(service.take_state(&state).is_ok());
        // A second presentation of the same state is rejected
        assert!(service.take_state(&state).is_err());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let service = test_service();
        assert!(service.take_state("never-issued").is_err());
    }
}
