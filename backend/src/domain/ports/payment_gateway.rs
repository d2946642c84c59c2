//! Driven port for the external payment gateway.
//!
//! The domain owns the order request and response contract; adapters own the
//! transport (HTTP, fixtures) and map their failures onto
//! [`PaymentGatewayError`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::payments::{PaymentOrder, PaymentOrderRequest};

/// Errors surfaced while calling the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentGatewayError {
    /// The gateway answered but refused the order.
    #[error("payment gateway rejected order: {message}")]
    Rejected { message: String },
    /// The gateway did not answer in time.
    #[error("payment gateway timeout: {message}")]
    Timeout { message: String },
    /// Network transport failed before a usable answer arrived.
    #[error("payment gateway transport failed: {message}")]
    Transport { message: String },
    /// The gateway answer could not be decoded.
    #[error("payment gateway response decode failed: {message}")]
    Decode { message: String },
    /// No gateway credentials are configured for this deployment.
    #[error("payment gateway is not configured")]
    Unconfigured,
}

impl PaymentGatewayError {
    /// Build a [`Self::Rejected`] error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Build a [`Self::Timeout`] error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Build a [`Self::Transport`] error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`Self::Decode`] error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for creating orders with the payment gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register an order the customer can then pay for.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use backend::domain::payments::{Currency, PaymentOrderRequest};
    /// use backend::domain::ports::{FixturePaymentGateway, PaymentGateway};
    ///
    /// let request = PaymentOrderRequest::new(49_900, Currency::Inr, "rcpt_1")?;
    /// let order = FixturePaymentGateway.create_order(&request).await?;
    /// assert_eq!(order.amount_minor, 49_900);
    /// ```
    async fn create_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError>;
}

/// Fixture gateway that accepts every order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        Ok(PaymentOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount_minor: request.amount_minor(),
            currency: request.currency(),
            receipt: request.receipt().to_owned(),
            status: "created".to_owned(),
        })
    }
}

/// Gateway used when no credentials are configured; always unconfigured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPaymentGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredPaymentGateway {
    async fn create_order(
        &self,
        _request: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        Err(PaymentGatewayError::Unconfigured)
    }
}
