use std::env;
use thiserror::Error;

/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Maximum number of pooled database connections. Defaults to [DEFAULT_DB_MAX_CONNECTIONS]
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// Address the HTTP server listens on. Defaults to [DEFAULT_BIND_ADDRESS]
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
/// Log level configuration for the application. For formatting info, see [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;


#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the {0} environment variable must be set")]
    Missing(&'static str),
    #[error("the {name} environment variable had an unusable value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Endpoints for the OpenTelemetry collector. Only present when both the span and metric
/// endpoints were configured.
#[derive(Debug, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Settings the server needs at startup, read from the environment
#[derive(Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_address: String,
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call [dotenv::dotenv] first if
    /// values should also come from a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DB_URL)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing(DB_URL))?;

        let db_max_connections = match lookup(DB_MAX_CONNECTIONS) {
            None => DEFAULT_DB_MAX_CONNECTIONS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: DB_MAX_CONNECTIONS,
                        value: raw,
                    });
                }
            },
        };

        let bind_address = lookup(BIND_ADDRESS).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned());

        let otel = match (lookup(OTEL_SPAN_EXPORT_URL), lookup(OTEL_METRIC_EXPORT_URL)) {
            (Some(spans), Some(metrics)) => Some(OtelEndpoints { spans, metrics }),
            _ => None,
        };

        Ok(AppConfig {
            database_url,
            db_max_connections,
            bind_address,
            otel,
        })
    }
}
