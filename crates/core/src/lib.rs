//! Order Intake Core - Shared types library.
//!
//! This crate provides the domain types behind the order form:
//! - [`OrderDraft`] - The in-progress, unsaved order record held in the form
//! - [`Quantity`] - Positive item count with a total input coercion
//! - [`Notification`] - Transient success/error message shown after a submission
//! - [`OrderForm`] - Draft, submitting flag, and notification owned by one form instance
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no HTTP
//! clients. The storefront crate drives [`OrderForm`] through a submission and
//! performs the network call itself.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
