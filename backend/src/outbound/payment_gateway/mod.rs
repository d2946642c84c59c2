//! Payment gateway outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `PaymentGateway`
//! port. Fixture and unconfigured gateways live beside the port itself.

mod dto;
mod http_gateway;

pub use http_gateway::{GatewayCredentials, HttpPaymentGateway, HttpPaymentGatewayBuildError};
