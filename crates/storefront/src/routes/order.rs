//! Order form route handlers.
//!
//! The browser holds the draft while the customer types. On submit, the
//! posted fields are bound into an `OrderForm`, the submission runs, and the
//! whole page renders again with the resulting draft and notification:
//! defaults after an accepted order, the customer's input after a failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use order_intake_core::{DraftField, Notification, OrderForm};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::ClientIp;
use crate::services::SubmitError;
use crate::state::AppState;

/// Order form data as posted by the browser.
///
/// Every field is raw text; missing fields bind as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub color: String,
    pub size: String,
    pub quantity: String,
}

impl OrderFormInput {
    fn raw(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
            DraftField::Address => &self.address,
            DraftField::Color => &self.color,
            DraftField::Size => &self.size,
            DraftField::Quantity => &self.quantity,
        }
    }

    /// Bind every posted field into a fresh form.
    #[must_use]
    pub fn into_form(self) -> OrderForm {
        let mut form = OrderForm::new();
        for field in DraftField::ALL {
            form.update_field(field, self.raw(field));
        }
        form
    }
}

/// One labeled input on the order form.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub field: DraftField,
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub invalid: bool,
}

impl FieldView {
    /// `type` attribute for single-line inputs.
    #[must_use]
    pub const fn input_type(&self) -> &'static str {
        match self.field {
            DraftField::Email => "email",
            DraftField::Quantity => "number",
            _ => "text",
        }
    }

    #[must_use]
    pub const fn is_multiline(&self) -> bool {
        matches!(self.field, DraftField::Address)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.field, DraftField::Quantity)
    }
}

/// Full order page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/page.html")]
pub struct OrderPageTemplate {
    pub fields: Vec<FieldView>,
    pub notification: Notification,
    pub auto_hide_ms: u32,
    pub submit_label: &'static str,
    pub submitting_label: &'static str,
    pub submit_disabled: bool,
}

impl From<&OrderForm> for OrderPageTemplate {
    fn from(form: &OrderForm) -> Self {
        let draft = form.draft();
        let fields = DraftField::ALL
            .into_iter()
            .map(|field| FieldView {
                field,
                name: field.name(),
                label: field.label(),
                value: draft.value(field),
                invalid: form.is_invalid(field),
            })
            .collect();

        Self {
            fields,
            notification: form.notification().clone(),
            auto_hide_ms: Notification::AUTO_HIDE_MS,
            submit_label: form.submit_label(),
            submitting_label: OrderForm::SUBMITTING_LABEL,
            submit_disabled: form.submit_disabled(),
        }
    }
}

/// Display the order form with a default draft.
///
/// GET /
#[instrument]
pub async fn show() -> impl IntoResponse {
    OrderPageTemplate::from(&OrderForm::new())
}

/// Submit the order form.
///
/// POST /order
///
/// Always renders the page; the notification carries the outcome. A client
/// over the submission rate limit gets its draft back without a request
/// being sent.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Form(input): Form<OrderFormInput>,
) -> impl IntoResponse {
    let mut form = input.into_form();

    if !state.order_limit().check(ip) {
        tracing::info!(client_ip = ?ip, "Order form submission throttled");
        form.defer();
        return OrderPageTemplate::from(&form);
    }

    if let Err(SubmitError::Form(e)) = state.orders().submit(&mut form).await {
        tracing::debug!(error = %e, "Order form not submitted");
    }

    OrderPageTemplate::from(&form)
}
