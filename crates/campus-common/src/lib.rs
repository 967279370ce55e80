//! # campus-common
//!
//! Shared utilities including configuration, error handling, session tokens, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService, TokenPair, TokenType};
pub use config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, IdentityConfig,
    JwtConfig, PaymentConfig, RateLimitConfig, ServerConfig, SiteConfig,
};
pub use error::{domain_status, AppError};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
