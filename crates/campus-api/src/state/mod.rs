//! Shared handler state: services, configuration and the database pool
//! probed by `/health/ready`.

use std::sync::Arc;

use campus_common::{AppConfig, JwtService};
use campus_db::PgPool;
use campus_service::ServiceContext;

#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// `None` when the services run over in-memory repositories
    pool: Option<PgPool>,
}

impl AppState {
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool: None,
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }

    /// Whether session cookies get the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.app.env.is_production()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.config.app.name)
            .field("env", &self.config.app.env)
            .field("has_pool", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}
