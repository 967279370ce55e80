//! Middleware stack for the API server
//!
//! Request IDs, tracing, timeouts, CORS, compression and rate limiting, plus
//! the session-aware page access rules.

pub mod access;
pub mod session;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use campus_common::{CorsConfig, RateLimitConfig};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub use access::access_control;
pub use session::SessionCaller;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the payment provider's shared webhook secret
pub const WEBHOOK_HASH_HEADER: &str = "verif-hash";

/// Upper bound on request handling, outbound provider calls included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the middleware stack with rate limiting and configured CORS
pub fn apply_middleware_with_config(
    router: Router<AppState>,
    rate_limit_config: &RateLimitConfig,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    // Request -> RateLimit -> RequestID -> Trace -> Timeout -> CORS -> Compression -> Handler
    let router = router
        .layer(CompressionLayer::new())
        .layer(create_cors_layer_from_config(cors_config, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ));

    // Global (not per-IP) bucket
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rate_limit_config.requests_per_second.into())
        .burst_size(rate_limit_config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish();

    match governor_conf {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            tracing::warn!(
                requests_per_second = rate_limit_config.requests_per_second,
                burst = rate_limit_config.burst,
                "Rate limiter disabled: invalid configuration"
            );
            router
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer_from_config(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
        ]);

    if is_production || !config.allowed_origins.is_empty() {
        if config.allowed_origins.is_empty() {
            tracing::warn!(
                "CORS: No allowed origins configured in production mode. \
                 Requests from browsers will be blocked."
            );
            return base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }

        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| {
                origin.parse::<HeaderValue>().ok().or_else(|| {
                    tracing::warn!(origin = %origin, "Invalid CORS origin");
                    None
                })
            })
            .collect();

        tracing::info!("CORS: Allowing {} configured origins", origins.len());
        // Session cookies ride along on cross-origin calls from the site
        base_layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    } else {
        tracing::warn!(
            "CORS: Allowing any origin (development mode). \
             Configure CORS_ALLOWED_ORIGINS for production."
        );
        base_layer.allow_origin(Any)
    }
}
