//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ORDER_INTAKE_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDER_INTAKE_PORT` - Listen port (default: 3000)
//! - `ORDER_INTAKE_STATIC_DIR` - Static asset directory
//!   (default: crates/storefront/static)
//! - `ORDER_ENDPOINT_URL` - Script endpoint that receives orders
//!   (default: [`DEFAULT_ORDER_ENDPOINT`])
//! - `ORDER_ENDPOINT_RELAY_URL` - Relay prefixed to the endpoint URL, for
//!   deployments that must go through a forwarding proxy
//! - `ORDER_INTAKE_LOG_FORMAT` - `json` for structured logs, anything else
//!   for text (default: text; also json when `FLY_APP_NAME` is set)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Apps Script deployment that receives orders.
pub const DEFAULT_ORDER_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbzTvmHV4zem6TqgVkKmJDB-2sjAgLIf7EIAJbrP0et0wpThWxaDRG5Ox3TwE67FO7o/exec";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Remote order endpoint
    pub order_endpoint: OrderEndpointConfig,
    /// Emit logs as JSON lines
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Remote order endpoint configuration.
///
/// Script deployment URLs accept unauthenticated posts, so the URL itself is
/// the credential. Implements `Debug` manually to redact it.
#[derive(Clone)]
pub struct OrderEndpointConfig {
    /// Script endpoint URL
    pub url: SecretString,
    /// Optional relay, requests go to `{relay}/{url}`
    pub relay_url: Option<String>,
}

impl std::fmt::Debug for OrderEndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEndpointConfig")
            .field("url", &"[REDACTED]")
            .field("relay_url", &self.relay_url)
            .finish()
    }
}

impl OrderEndpointConfig {
    /// Config for a bare endpoint with no relay.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: SecretString::from(url.into()),
            relay_url: None,
        }
    }

    /// The URL the order request is actually sent to.
    #[must_use]
    pub fn request_url(&self) -> String {
        let endpoint = self.url.expose_secret();
        match &self.relay_url {
            Some(relay) => format!("{}/{endpoint}", relay.trim_end_matches('/')),
            None => endpoint.to_string(),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let url = get_env_or_default("ORDER_ENDPOINT_URL", DEFAULT_ORDER_ENDPOINT);
        validate_url("ORDER_ENDPOINT_URL", &url)?;

        let relay_url = get_optional_env("ORDER_ENDPOINT_RELAY_URL");
        if let Some(relay) = &relay_url {
            validate_url("ORDER_ENDPOINT_RELAY_URL", relay)?;
        }

        Ok(Self {
            url: SecretString::from(url),
            relay_url,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ORDER_INTAKE_HOST", "127.0.0.1")?;
        let port = parse_env("ORDER_INTAKE_PORT", "3000")?;
        let static_dir = PathBuf::from(get_env_or_default(
            "ORDER_INTAKE_STATIC_DIR",
            "crates/storefront/static",
        ));
        let order_endpoint = OrderEndpointConfig::from_env()?;
        let json_logs = get_optional_env("ORDER_INTAKE_LOG_FORMAT").map_or_else(
            || get_optional_env("FLY_APP_NAME").is_some(),
            |format| is_json_format(&format),
        );

        Ok(Self {
            host,
            port,
            static_dir,
            order_endpoint,
            json_logs,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Config for local runs and tests: loopback, ephemeral port, no Sentry.
    #[must_use]
    pub fn local(order_endpoint: OrderEndpointConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            order_endpoint,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to a default.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

/// Validate that a value is an absolute http(s) URL.
fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{scheme}'"),
        )),
    }
}
