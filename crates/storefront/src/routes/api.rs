//! JSON order API.
//!
//! Same submission path as the HTML form, for callers that post JSON.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use order_intake_core::{OrderDraft, OrderForm};
use tracing::instrument;

use crate::error::{OrderResponse, Result};
use crate::state::AppState;

/// Submit an order as JSON.
///
/// POST /api/orders
///
/// The body is the draft object; `quantity` is coerced and clamped like the
/// form input. Responds `200` when the endpoint accepts the order, `400` when
/// required fields are missing, `502` when the endpoint fails. Unreadable
/// bodies get the same JSON error shape with the rejection's status.
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderDraft>, JsonRejection>,
) -> Result<Json<OrderResponse>> {
    let Json(draft) = payload?;
    let mut form = OrderForm::from_draft(draft);
    state.orders().submit(&mut form).await?;

    Ok(Json(OrderResponse {
        success: true,
        message: form.notification().message.clone(),
    }))
}
