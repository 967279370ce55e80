use std::path::Path;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// Sizing and timeouts for the Postgres pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Idle connections above `min_connections` are closed after this
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(5 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }

    /// `max` is raised to `min` when given lower
    #[must_use]
    pub fn with_connections(mut self, min: u32, max: u32) -> Self {
        self.min_connections = min;
        self.max_connections = max.max(min);
        self
    }
}

pub async fn create_pool(config: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Postgres pool ready"
    );
    Ok(pool)
}

/// Apply the migrations shipped in this crate's `migrations/` directory
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations"));
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;
    info!(count = migrator.iter().count(), "Database migrations applied");
    Ok(())
}
