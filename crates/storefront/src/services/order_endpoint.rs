//! Client for the remote script endpoint that receives orders.
//!
//! The endpoint contract is a single JSON POST. Any 2xx status is an accepted
//! order; the response body is ignored.

use order_intake_core::{FormError, OrderDraft, OrderForm, SubmissionOutcome};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::OrderEndpointConfig;
use crate::error::add_breadcrumb;

/// Characters of an error response body kept for logging.
const MAX_ERROR_BODY: usize = 512;

/// Errors that can occur when sending an order.
#[derive(Debug, Error)]
pub enum OrderEndpointError {
    /// The request could not complete (DNS, connection, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Why a form submission did not go through.
///
/// By the time this is returned the form has already been updated with the
/// matching notification.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submission never started.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The draft was sent but not accepted.
    #[error(transparent)]
    Endpoint(#[from] OrderEndpointError),
}

/// Order endpoint client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct OrderEndpointClient {
    client: reqwest::Client,
    url: SecretString,
}

impl OrderEndpointClient {
    /// Create a new order endpoint client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &OrderEndpointConfig) -> Result<Self, OrderEndpointError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: SecretString::from(config.request_url()),
        })
    }

    /// Post a draft to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status.
    #[instrument(skip_all, fields(quantity = %draft.quantity))]
    pub async fn send_order(&self, draft: &OrderDraft) -> Result<(), OrderEndpointError> {
        let response = self
            .client
            .post(self.url.expose_secret())
            .json(draft)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(OrderEndpointError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Run one submission for a form.
    ///
    /// Moves the form into its submitting phase, sends the draft, and
    /// completes the submission. The form only learns accepted or failed;
    /// the failure cause is returned for logging and status mapping.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Form`] if the submission could not start (already
    ///   submitting, or required fields missing). No request is made.
    /// - [`SubmitError::Endpoint`] on transport failure or a non-success status.
    pub async fn submit(&self, form: &mut OrderForm) -> Result<(), SubmitError> {
        let draft = form.begin_submission()?;

        let result = self.send_order(&draft).await;
        match &result {
            Ok(()) => {
                tracing::info!(quantity = %draft.quantity, "Order submitted");
                add_breadcrumb("order", "Order submitted", None);
                form.complete_submission(SubmissionOutcome::Accepted);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order submission failed");
                form.complete_submission(SubmissionOutcome::Failed);
            }
        }

        result.map_err(SubmitError::Endpoint)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use order_intake_core::{DraftField, Notification, Quantity};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn ana() -> OrderDraft {
        OrderDraft {
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            phone: "555".to_string(),
            address: "1 Main St".to_string(),
            color: "Red".to_string(),
            size: "M".to_string(),
            quantity: Quantity::new(2),
        }
    }

    fn client_for(server: &MockServer) -> OrderEndpointClient {
        let config = OrderEndpointConfig::new(format!("{}/exec", server.uri()));
        OrderEndpointClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_send_order_posts_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/exec"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "name": "Ana",
                "email": "a@b.com",
                "phone": "555",
                "address": "1 Main St",
                "color": "Red",
                "size": "M",
                "quantity": 2
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).send_order(&ana()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_order_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let err = client_for(&server).send_order(&ana()).await.unwrap_err();
        assert!(matches!(
            err,
            OrderEndpointError::Api { status: 503, ref message } if message == "try later"
        ));
    }

    #[tokio::test]
    async fn test_submit_success_resets_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"result\":\"ok\"}"))
            .mount(&server)
            .await;

        let mut form = OrderForm::from_draft(ana());
        client_for(&server).submit(&mut form).await.unwrap();

        assert_eq!(form.draft(), &OrderDraft::default());
        assert_eq!(form.notification().message, Notification::SUBMITTED);
        assert!(!form.submit_disabled());
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let mut form = OrderForm::from_draft(ana());
        let err = client_for(&server).submit(&mut form).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Endpoint(OrderEndpointError::Api { status: 400, .. })
        ));
        assert_eq!(form.draft(), &ana());
        assert!(form.notification().is_error());
        assert!(!form.submit_disabled());
    }

    #[tokio::test]
    async fn test_transport_failure_matches_status_failure() {
        // Reserve a port, then free it so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = OrderEndpointConfig::new(format!("http://{addr}/exec"));
        let client = OrderEndpointClient::new(&config).unwrap();

        let mut form = OrderForm::from_draft(ana());
        let err = client.submit(&mut form).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Endpoint(OrderEndpointError::Http(_))
        ));
        assert_eq!(form.draft(), &ana());
        assert_eq!(form.notification().message, Notification::SUBMIT_FAILED);
    }

    #[tokio::test]
    async fn test_submit_incomplete_draft_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut form = OrderForm::from_draft(ana().update_field(DraftField::Name, ""));
        let err = client_for(&server).submit(&mut form).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Form(FormError::Validation { .. })
        ));
        assert_eq!(form.notification().message, Notification::INCOMPLETE);
    }
}
