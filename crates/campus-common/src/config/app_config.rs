//! Configuration read from the process environment.
//!
//! A `.env` file is loaded first when present. Secrets stay wrapped in
//! [`SecretString`] until the client that needs them is built.

use std::env;
use std::str::FromStr;

use secrecy::SecretString;

pub const DEFAULT_APP_NAME: &str = "campus";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PAYMENT_API_BASE_URL: &str = "https://api.flutterwave.com";

/// Access token lifetime, seconds
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 15 * 60;
/// Refresh token lifetime, seconds
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub site: SiteConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub payment: PaymentConfig,
    pub identity: IdentityConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Secure cookies, strict CORS and JSON logs are production-only
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Public base URL, used in invitation links and payment redirects
    pub url: String,
}

impl SiteConfig {
    /// Join a path onto the public base URL
    #[must_use]
    pub fn link(&self, path: &str) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Apply bundled migrations at startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Secret API key used for outbound provider calls
    pub secret_key: SecretString,
    /// Shared secret the provider echoes in the `verif-hash` header
    pub webhook_hash: SecretString,
    pub api_base_url: String,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: SecretString,
}

/// Global token bucket shared by every client
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Source of configuration values; the process environment outside tests
trait Vars {
    fn get(&self, name: &str) -> Option<String>;

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar(name))
    }

    fn secret(&self, name: &'static str) -> Result<SecretString, ConfigError> {
        self.required(name).map(SecretString::new)
    }

    fn text_or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(name, raw)),
            None => Ok(default),
        }
    }
}

struct ProcessEnv;

impl Vars for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(&ProcessEnv)
    }

    fn from_vars(vars: &impl Vars) -> Result<Self, ConfigError> {
        let port = vars.required("API_PORT")?;
        let env = match vars.get("APP_ENV") {
            Some(raw) => raw
                .parse()
                .map_err(|()| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        Ok(Self {
            app: AppSettings {
                name: vars.text_or("APP_NAME", DEFAULT_APP_NAME),
                env,
            },
            api: ServerConfig {
                host: vars.text_or("API_HOST", DEFAULT_HOST),
                port: port
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("API_PORT", port.clone()))?,
            },
            site: SiteConfig {
                url: vars.text_or("SITE_URL", DEFAULT_SITE_URL),
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", 20)?,
                min_connections: vars.parsed_or("DATABASE_MIN_CONNECTIONS", 5)?,
                run_migrations: vars.parsed_or("DATABASE_RUN_MIGRATIONS", false)?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars
                    .parsed_or("JWT_ACCESS_TOKEN_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY)?,
                refresh_token_expiry: vars
                    .parsed_or("JWT_REFRESH_TOKEN_EXPIRY", DEFAULT_REFRESH_TOKEN_EXPIRY)?,
            },
            payment: PaymentConfig {
                secret_key: vars.secret("PAYMENT_SECRET_KEY")?,
                webhook_hash: vars.secret("PAYMENT_WEBHOOK_HASH")?,
                api_base_url: vars.text_or("PAYMENT_API_BASE_URL", DEFAULT_PAYMENT_API_BASE_URL),
            },
            identity: IdentityConfig {
                api_url: vars.required("AUTH_API_URL")?,
                api_key: vars.secret("AUTH_API_KEY")?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars.parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", 10)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", 50)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}
