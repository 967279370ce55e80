//! Identity provider adapter - authorization-code exchange over HTTP.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use uuid::Uuid;

use campus_core::{DomainError, GatewayResult, IdentityProvider, IdentityUser};

use crate::build_client;

/// Identity provider endpoint and project key.
#[derive(Clone)]
pub struct IdentityConfig {
    api_url: String,
    api_key: SecretString,
}

impl IdentityConfig {
    pub fn new(api_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Exchanges authorization codes at `{api_url}/token`.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    config: IdentityConfig,
    http_client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityConfig) -> GatewayResult<Self> {
        let http_client = build_client()
            .map_err(|e| DomainError::IdentityProviderError(format!("client setup: {e}")))?;
        Ok(Self { config, http_client })
    }
}

#[derive(Debug, Serialize)]
struct CodeExchange<'a> {
    auth_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl From<ProviderUser> for IdentityUser {
    fn from(user: ProviderUser) -> Self {
        Self {
            id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
            full_name: user.user_metadata.full_name.or(user.user_metadata.name),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> GatewayResult<IdentityUser> {
        if code.is_empty() {
            return Err(DomainError::IdentityProviderError("empty authorization code".into()));
        }

        let url = format!("{}/token", self.config.api_url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("grant_type", "authorization_code")])
            .header("apikey", self.config.api_key.expose_secret())
            .json(&CodeExchange { auth_code: code })
            .send()
            .await
            .map_err(|e| DomainError::IdentityProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Authorization code exchange rejected");
            return Err(DomainError::IdentityProviderError(format!(
                "code exchange returned {status}"
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            DomainError::IdentityProviderError(format!("failed to parse token response: {e}"))
        })?;

        Ok(body.user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_maps_user() {
        let body: TokenResponse = serde_json::from_str(
            r#"{
                "access_token": "ey...",
                "token_type": "bearer",
                "user": {
                    "id": "8d0f6c1e-54b2-4b5e-9a51-1b7c2f0f9a10",
                    "email": "ada@example.com",
                    "user_metadata": { "full_name": "Ada Lovelace" }
                }
            }"#,
        )
        .unwrap();

        let user: IdentityUser = body.user.into();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_missing_metadata_and_blank_email() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"user": {"id": "8d0f6c1e-54b2-4b5e-9a51-1b7c2f0f9a10", "email": ""}}"#,
        )
        .unwrap();

        let user: IdentityUser = body.user.into();
        assert_eq!(user.email, None);
        assert_eq!(user.full_name, None);
    }

    #[tokio::test]
    async fn test_empty_code_is_rejected_without_a_request() {
        let provider = HttpIdentityProvider::new(IdentityConfig::new(
            "http://127.0.0.1:9/auth/v1",
            SecretString::new("anon".to_string()),
        ))
        .unwrap();

        let err = provider.exchange_code("").await.unwrap_err();
        assert!(err.is_external());
    }
}
