//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors and transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fill the span field, echo the header)
//! 4. Security headers (CSP, frame and referrer policies)
//! 5. Rate limiting (governor, JSON order API; the HTML form checks the
//!    same limiter in its handler)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::{ClientIp, OrderRateLimit};
pub use request_id::{make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
