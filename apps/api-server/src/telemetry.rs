//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,api_server=debug,quill_infra=debug";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json|pretty`; anything else falls back to JSON in
    /// production and pretty output during development.
    fn resolve(raw: Option<&str>, production: bool) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ if production => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Recorded on the startup event so aggregated logs can be told apart.
    pub service_name: String,
}

impl TelemetryConfig {
    /// Reads `LOG_FORMAT`, `SERVICE_NAME` and `RUST_ENV`.
    pub fn from_env() -> Self {
        let production = std::env::var("RUST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Self {
            format: LogFormat::resolve(std::env::var("LOG_FORMAT").ok().as_deref(), production),
            service_name: std::env::var("SERVICE_NAME").unwrap_or_else(|_| "quill-api".into()),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }

    tracing::info!(
        service = %config.service_name,
        format = ?config.format,
        "Telemetry initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins() {
        assert_eq!(LogFormat::resolve(Some("JSON"), false), LogFormat::Json);
        assert_eq!(LogFormat::resolve(Some("pretty"), true), LogFormat::Pretty);
    }

    #[test]
    fn production_defaults_to_json() {
        assert_eq!(LogFormat::resolve(None, true), LogFormat::Json);
        assert_eq!(LogFormat::resolve(Some("xml"), false), LogFormat::Pretty);
    }
}
