//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::middleware::OrderRateLimit;
use crate::services::{OrderEndpointClient, OrderEndpointError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is read-only once built.
/// Per-request form state never lives here; each submission owns its own
/// `OrderForm`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    orders: OrderEndpointClient,
    order_limit: OrderRateLimit,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order endpoint HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, OrderEndpointError> {
        let orders = OrderEndpointClient::new(&config.order_endpoint)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                orders,
                order_limit: OrderRateLimit::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order endpoint client.
    #[must_use]
    pub fn orders(&self) -> &OrderEndpointClient {
        &self.inner.orders
    }

    /// Get a reference to the per-IP submission limiter.
    #[must_use]
    pub fn order_limit(&self) -> &OrderRateLimit {
        &self.inner.order_limit
    }
}
