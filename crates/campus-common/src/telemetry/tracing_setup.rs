//! `tracing` subscriber setup.
//!
//! `RUST_LOG` wins over the preset's filter when set.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset. sqlx logs every statement at info.
const DEFAULT_FILTER: &str = "info,sqlx=warn";
const DEBUG_FILTER: &str = "debug,sqlx=warn,hyper=info,tower_http=debug";

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub filter: String,
    /// One JSON object per line instead of human-readable text
    pub json: bool,
    /// Log span open/close, useful for request timing in development
    pub span_events: bool,
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            filter: DEBUG_FILTER.to_string(),
            span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            file_line: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Production => Self::production(),
            Environment::Staging => Self::default(),
            Environment::Development => Self::development(),
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(spans);

        if self.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }
}

/// Install the global subscriber with the default preset
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::default())
}

/// Install the global subscriber. Fails instead of panicking when one is
/// already installed.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_follow_environment() {
        let prod = TracingConfig::for_environment(Environment::Production);
        assert!(prod.json);
        assert!(!prod.file_line);
        assert_eq!(prod.filter, DEFAULT_FILTER);

        let dev = TracingConfig::for_environment(Environment::Development);
        assert!(!dev.json);
        assert!(dev.span_events);
        assert!(dev.filter.starts_with("debug"));
    }

    #[test]
    fn second_init_reports_already_initialized() {
        let _ = try_init_tracing();
        assert!(matches!(
            try_init_tracing(),
            Err(TracingError::AlreadyInitialized)
        ));
    }
}
