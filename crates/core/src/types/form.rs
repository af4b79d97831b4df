//! Order form state and the submission state machine.
//!
//! ```text
//! idle ──begin_submission──▶ submitting ──complete_submission──▶ idle
//!                                                   (success: draft reset,
//!                                                    failure: draft kept)
//! ```

use thiserror::Error;

use super::draft::{DraftField, OrderDraft};
use super::notification::Notification;

/// Errors raised by form operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A field name that is not part of the draft.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A submission is already running for this form.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// Required fields are empty or malformed.
    #[error("missing or invalid fields: {}", join_fields(fields))]
    Validation { fields: Vec<DraftField> },
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// Result of sending a draft to the order endpoint.
///
/// Transport errors and non-success statuses both map to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Failed,
}

/// State owned by one order form instance: the draft, the submitting flag,
/// and the last notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    draft: OrderDraft,
    phase: SubmissionPhase,
    notification: Notification,
    invalid: Vec<DraftField>,
}

impl OrderForm {
    pub const SUBMIT_LABEL: &'static str = "Place Order";
    pub const SUBMITTING_LABEL: &'static str = "Processing...";

    /// A fresh form with a default draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form holding an existing draft, e.g. one bound from a posted request.
    #[must_use]
    pub fn from_draft(draft: OrderDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    #[must_use]
    pub const fn notification(&self) -> &Notification {
        &self.notification
    }

    #[must_use]
    pub const fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Fields flagged by the last required-field check.
    #[must_use]
    pub fn invalid_fields(&self) -> &[DraftField] {
        &self.invalid
    }

    #[must_use]
    pub fn is_invalid(&self, field: DraftField) -> bool {
        self.invalid.contains(&field)
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitting)
    }

    /// Whether the submit control is disabled. True exactly while submitting.
    #[must_use]
    pub const fn submit_disabled(&self) -> bool {
        self.is_submitting()
    }

    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            Self::SUBMITTING_LABEL
        } else {
            Self::SUBMIT_LABEL
        }
    }

    /// Replace one field of the draft with raw input.
    pub fn update_field(&mut self, field: DraftField, raw: &str) {
        let draft = std::mem::take(&mut self.draft);
        self.draft = draft.update_field(field, raw);
        self.invalid.retain(|&f| f != field);
    }

    /// Enter the submitting phase and return the draft to send.
    ///
    /// # Errors
    ///
    /// - [`FormError::SubmissionInProgress`] if a submission is already running.
    /// - [`FormError::Validation`] if required fields are missing; the form
    ///   stays idle, the fields are flagged, and an error notification opens.
    pub fn begin_submission(&mut self) -> Result<OrderDraft, FormError> {
        if self.is_submitting() {
            return Err(FormError::SubmissionInProgress);
        }

        if let Err(err) = self.draft.validate() {
            if let FormError::Validation { fields } = &err {
                self.invalid.clone_from(fields);
            }
            self.notification = Notification::error(Notification::INCOMPLETE);
            return Err(err);
        }

        self.invalid.clear();
        self.phase = SubmissionPhase::Submitting;
        Ok(self.draft.clone())
    }

    /// Leave the submitting phase and surface the outcome.
    ///
    /// On success the draft is reset to defaults; on failure it is kept so
    /// the user can retry.
    pub fn complete_submission(&mut self, outcome: SubmissionOutcome) {
        self.phase = SubmissionPhase::Idle;
        match outcome {
            SubmissionOutcome::Accepted => {
                self.draft = OrderDraft::default();
                self.notification = Notification::success(Notification::SUBMITTED);
            }
            SubmissionOutcome::Failed => {
                self.notification = Notification::error(Notification::SUBMIT_FAILED);
            }
        }
    }

    /// Turn a submission away without attempting it.
    ///
    /// Used when the client is submitting too fast. The draft is kept and the
    /// form stays idle.
    pub fn defer(&mut self) {
        self.phase = SubmissionPhase::Idle;
        self.notification = Notification::error(Notification::TOO_MANY);
    }

    pub fn dismiss_notification(&mut self) {
        self.notification.dismiss();
    }
}
