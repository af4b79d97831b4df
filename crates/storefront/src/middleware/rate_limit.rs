//! Rate limiting using governor and `tower_governor`.
//!
//! Every accepted submission triggers an outbound call to the order endpoint,
//! so submissions are limited per client IP. The JSON API is wrapped in a
//! `GovernorLayer`; the HTML form checks the same limiter in its handler so a
//! throttled customer gets the page back with their draft.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{Extensions, HeaderMap, Request, request::Parts};
use axum::response::IntoResponse;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
};

use crate::error::AppError;

/// Proxy headers checked for the client IP, most specific first.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Client IP from proxy headers, then the peer address from `ConnectInfo`.
///
/// `x-forwarded-for` may hold a chain; the first entry is the client.
fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    let from_headers = CLIENT_IP_HEADERS.iter().find_map(|name| {
        headers
            .get(*name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    });

    from_headers.or_else(|| {
        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}

/// Key extractor that trusts proxy headers, then falls back to the peer
/// address.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req.headers(), req.extensions()).ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Extractor for the client IP, resolved the same way as the rate limit key.
///
/// `None` when neither a proxy header nor connect info is available.
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_ip(&parts.headers, &parts.extensions)))
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

type OrderGovernorConfig = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Per-IP limiter shared by both submission routes: ~12 per minute per IP.
///
/// Configuration: 1 token every 5 seconds, burst of 5. A customer retrying a
/// failed order by hand rarely gets near this.
#[derive(Clone)]
pub struct OrderRateLimit {
    config: Arc<OrderGovernorConfig>,
}

impl OrderRateLimit {
    /// # Panics
    ///
    /// This function will not panic. `per_second(5)` and `burst_size(5)` are
    /// valid positive values, which `GovernorConfigBuilder` always accepts.
    #[must_use]
    pub fn new() -> Self {
        let config = GovernorConfigBuilder::default()
            .key_extractor(ClientIpKeyExtractor)
            .per_second(5)
            .burst_size(5)
            .finish()
            .expect("rate limiter config with per_second(5) and burst_size(5) is valid");

        Self {
            config: Arc::new(config),
        }
    }

    /// Layer for JSON routes; throttled requests get the API error body.
    #[must_use]
    pub fn layer(&self) -> RateLimiterLayer {
        GovernorLayer::new(Arc::clone(&self.config)).error_handler(governor_error_response)
    }

    /// Take one token for `ip`. Returns `false` when the client is over the
    /// limit. Requests with no resolvable IP are not limited here.
    #[must_use]
    pub fn check(&self, ip: Option<IpAddr>) -> bool {
        ip.is_none_or(|ip| self.config.limiter().check_key(&ip).is_ok())
    }
}

impl Default for OrderRateLimit {
    fn default() -> Self {
        Self::new()
    }
}

fn governor_error_response(err: GovernorError) -> axum::response::Response {
    match err {
        GovernorError::TooManyRequests { .. } => AppError::RateLimited,
        other => AppError::Internal(other.to_string()),
    }
    .into_response()
}
