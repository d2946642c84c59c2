//! Domain ports and supporting types for the hexagonal boundary.

mod payment_gateway;

#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    FixturePaymentGateway, PaymentGateway, PaymentGatewayError, UnconfiguredPaymentGateway,
};
