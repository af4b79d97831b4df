//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /               - Order form page
//! POST /order          - Submit the order form (renders the page again)
//! POST /api/orders     - Submit an order as JSON
//! GET  /health         - Health check (added in lib)
//! ```

pub mod api;
pub mod order;

use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the JSON API routes router, behind the shared order rate limiter.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(api::create_order))
        .layer(state.order_limit().layer())
}

/// Create all routes for the storefront.
///
/// `POST /order` checks the same limiter inside its handler.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(order::show))
        .route("/order", post(order::submit))
        .merge(api_routes(state))
        .fallback(not_found)
}

/// Fallback for unknown paths.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
