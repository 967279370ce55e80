//! Campus API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p campus-api
//! ```
//!
//! Configuration is read from environment variables (and `.env` when present).

use campus_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Config first: the log format depends on APP_ENV
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.api.address(),
        site = %config.site.url,
        "Starting Campus API Server"
    );

    if let Err(e) = campus_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
