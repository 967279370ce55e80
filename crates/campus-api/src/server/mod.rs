//! Server setup and initialization
//!
//! Provides the application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};
use campus_common::{AppConfig, AppError, JwtService};
use campus_db::{
    create_pool, run_migrations, PoolConfig, PgCommunityRepository, PgCourseRepository,
    PgEnrollmentRepository, PgInvitationRepository, PgLessonRepository, PgMembershipRepository,
    PgNotificationRepository, PgProfileRepository, PgSpaceRepository,
};
use campus_payments::{FlutterwaveConfig, FlutterwaveGateway, HttpIdentityProvider};
use campus_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::handlers::not_found;
use crate::middleware::{access_control, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    // The fallback is registered before layering so page paths without a
    // route still pass through the access rules.
    let app = create_router()
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), access_control));

    let app = apply_middleware_with_config(
        app,
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    Router::new()
        .merge(health_routes())
        .merge(app)
        .with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = PoolConfig::new(config.database.url.clone()).with_connections(
        config.database.min_connections,
        config.database.max_connections,
    );
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        info!("Applying database migrations...");
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let payment_gateway = FlutterwaveGateway::new(
        FlutterwaveConfig::new(config.payment.secret_key.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    )
    .map_err(|e| AppError::Config(e.to_string()))?;

    let identity_provider = HttpIdentityProvider::new(campus_payments::IdentityConfig::new(
        config.identity.api_url.clone(),
        config.identity.api_key.clone(),
    ))
    .map_err(|e| AppError::Config(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let service_context = ServiceContextBuilder::new()
        .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
        .community_repo(Arc::new(PgCommunityRepository::new(pool.clone())))
        .space_repo(Arc::new(PgSpaceRepository::new(pool.clone())))
        .course_repo(Arc::new(PgCourseRepository::new(pool.clone())))
        .lesson_repo(Arc::new(PgLessonRepository::new(pool.clone())))
        .invitation_repo(Arc::new(PgInvitationRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .enrollment_repo(Arc::new(PgEnrollmentRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .payment_gateway(Arc::new(payment_gateway))
        .identity_provider(Arc::new(identity_provider))
        .jwt_service(jwt_service)
        .site(config.site.clone())
        .webhook_hash(config.payment.webhook_hash.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config).with_pool(pool))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
