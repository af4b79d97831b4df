//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding. Errors render as the same JSON shape the order
//! API uses for its successful responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use order_intake_core::{FormError, Notification};
use serde::Serialize;
use thiserror::Error;

use crate::services::{OrderEndpointError, SubmitError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The posted order failed the required-field check.
    #[error("Validation error: {0}")]
    Validation(FormError),

    /// The remote order endpoint rejected the order or could not be reached.
    #[error("Order endpoint error: {0}")]
    Endpoint(#[from] OrderEndpointError),

    /// The request body was not a readable order.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// The client is submitting faster than the rate limit allows.
    #[error("Rate limited")]
    RateLimited,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation { .. } => Self::Validation(err),
            FormError::UnknownField(_) | FormError::SubmissionInProgress => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Form(err) => err.into(),
            SubmitError::Endpoint(err) => Self::Endpoint(err),
        }
    }
}

/// Client message for an unreadable order body.
pub const INVALID_BODY: &str = "Invalid order data.";

/// JSON body for order API responses and errors.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub message: String,
}

impl AppError {
    /// Whether this error is captured to Sentry when it becomes a response.
    ///
    /// Endpoint failures are already reported by the order client's warning.
    const fn reports_to_sentry(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.reports_to_sentry() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody(rejection) => rejection.status(),
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Endpoint(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Validation(_) => Notification::INCOMPLETE.to_string(),
            Self::InvalidBody(_) => INVALID_BODY.to_string(),
            Self::RateLimited => Notification::TOO_MANY.to_string(),
            Self::Endpoint(_) => Notification::SUBMIT_FAILED.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(_) => self.to_string(),
        };

        (
            status,
            Json(OrderResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("order", "Order submitted", Some(&[("quantity", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use order_intake_core::DraftField;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("/nope".to_string());
        assert_eq!(err.to_string(), "Not found: /nope");

        let err = AppError::from(FormError::Validation {
            fields: vec![DraftField::Email],
        });
        assert_eq!(
            err.to_string(),
            "Validation error: missing or invalid fields: email"
        );
    }

    #[test]
    fn test_form_error_mapping() {
        assert!(matches!(
            AppError::from(FormError::SubmissionInProgress),
            AppError::Internal(_)
        ));
        assert!(matches!(
            AppError::from(FormError::Validation { fields: vec![] }),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_only_internal_errors_report_to_sentry() {
        assert!(AppError::Internal("boom".to_string()).reports_to_sentry());
        assert!(
            !AppError::Endpoint(OrderEndpointError::Api {
                status: 500,
                message: "boom".to_string()
            })
            .reports_to_sentry()
        );
        assert!(!AppError::RateLimited.reports_to_sentry());
        assert!(!AppError::NotFound("/x".to_string()).reports_to_sentry());
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation(FormError::Validation { fields: vec![] })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Endpoint(OrderEndpointError::Api {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(get_status(AppError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
