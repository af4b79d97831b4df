//! Integration tests for Order Intake.
//!
//! Each test gets its own storefront bound to an ephemeral port and its own
//! mock order endpoint, so tests run in parallel without sharing state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p order-intake-integration-tests
//! ```

use std::net::SocketAddr;

use order_intake_storefront::{
    app,
    config::{OrderEndpointConfig, StorefrontConfig},
    state::AppState,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the mock endpoint listens on.
pub const ENDPOINT_PATH: &str = "/exec";

/// A running storefront plus the mock endpoint it submits to.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub endpoint: MockServer,
}

impl TestContext {
    /// Start a storefront wired to a fresh mock endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    pub async fn new() -> Self {
        let endpoint = MockServer::start().await;
        let endpoint_url = format!("{}{ENDPOINT_PATH}", endpoint.uri());
        let base_url = spawn_storefront(&endpoint_url).await;

        Self {
            client: reqwest::Client::new(),
            base_url,
            endpoint,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Make the mock endpoint answer every order with `status`.
    pub async fn endpoint_responds(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(ENDPOINT_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.endpoint)
            .await;
    }

    /// JSON bodies the mock endpoint has received, in order.
    pub async fn received_orders(&self) -> Vec<serde_json::Value> {
        self.endpoint
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<serde_json::Value>().ok())
            .collect()
    }
}

/// Start a storefront that submits orders to `endpoint_url`; returns its base URL.
///
/// # Panics
///
/// Panics if the server cannot bind a local port.
pub async fn spawn_storefront(endpoint_url: &str) -> String {
    let config = StorefrontConfig::local(OrderEndpointConfig::new(endpoint_url));
    let state = AppState::new(config).expect("state should build");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("storefront server");
    });

    format!("http://{addr}")
}

/// The draft from the end-to-end scenario, as posted form fields.
#[must_use]
pub fn ana_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Ana"),
        ("email", "a@b.com"),
        ("phone", "555"),
        ("address", "1 Main St"),
        ("color", "Red"),
        ("size", "M"),
        ("quantity", "2"),
    ]
}

/// The same draft as the JSON the endpoint should receive.
#[must_use]
pub fn ana_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Ana",
        "email": "a@b.com",
        "phone": "555",
        "address": "1 Main St",
        "color": "Red",
        "size": "M",
        "quantity": 2
    })
}
