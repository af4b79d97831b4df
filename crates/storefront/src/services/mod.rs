//! Outbound service clients for the storefront.
//!
//! # Services
//!
//! - `order_endpoint` - Remote script endpoint that receives submitted orders

pub mod order_endpoint;

pub use order_endpoint::{OrderEndpointClient, OrderEndpointError, SubmitError};
