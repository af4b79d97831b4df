//! Core types for Order Intake.
//!
//! This module provides type-safe wrappers for the order form's domain concepts.

pub mod draft;
pub mod email;
pub mod form;
pub mod notification;
pub mod quantity;

pub use draft::{DraftField, OrderDraft};
pub use email::{Email, EmailError};
pub use form::{FormError, OrderForm, SubmissionOutcome, SubmissionPhase};
pub use notification::{Notification, Severity};
pub use quantity::Quantity;
