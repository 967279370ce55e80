//! Test helpers for integration tests
//!
//! Spawns test servers, seeds profiles, and wraps HTTP calls.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use campus_api::{create_app, create_app_state};
use campus_common::{AppConfig, JwtService};
use campus_core::{PlatformRole, Profile, ProfileRepository};
use campus_db::{create_pool, PgPool, PgProfileRepository, PoolConfig};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::fixtures::unique_suffix;

/// A seeded profile with a minted session
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pool: PgPool,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry,
            config.jwt.refresh_token_expiry,
        );

        // Separate from the server's pool; only used to seed rows
        let pool = create_pool(&PoolConfig::new(config.database.url.clone()).with_connections(1, 2)).await?;
        let state = create_app_state(config).await?;
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Redirects are part of what the tests assert
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            addr,
            client,
            pool,
            jwt,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Insert a profile directly and mint a session for it
    pub async fn seed_user(&self, role: PlatformRole) -> Result<TestUser> {
        let email = format!("user{}@example.com", unique_suffix());
        let mut profile = Profile::new(Uuid::new_v4(), Some(email.clone()), None);
        profile.role = role;

        PgProfileRepository::new(self.pool.clone()).ensure(&profile).await?;

        let tokens = self.jwt.generate_token_pair(profile.id, Some(email.clone()))?;

        Ok(TestUser {
            id: profile.id,
            email,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with a session
    pub async fn get_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(&user.access_token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body and no session
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with a session
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        user: &TestUser,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(&user.access_token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a body-less POST request with a session
    pub async fn post_empty_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(&user.access_token)
            .send()
            .await?)
    }

    /// Make a PATCH request with a session
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        user: &TestUser,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(&user.access_token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with a session
    pub async fn delete_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(&user.access_token)
            .send()
            .await?)
    }

    /// POST a raw webhook body with the given `verif-hash`
    pub async fn post_webhook(&self, verif_hash: &str, body: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/webhook/payment"))
            .header("verif-hash", verif_hash)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await?)
    }
}

/// Create a test configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.database.run_migrations = true;
    // Tests fire requests faster than any sane production limit
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;

    Ok(config)
}

/// Check that the variables the server needs are set
pub async fn check_test_env() -> bool {
    for var in [
        "DATABASE_URL",
        "JWT_SECRET",
        "PAYMENT_SECRET_KEY",
        "PAYMENT_WEBHOOK_HASH",
        "AUTH_API_URL",
        "AUTH_API_KEY",
    ] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Location header of a redirect
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
