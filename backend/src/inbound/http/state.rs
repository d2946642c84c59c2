//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain use-cases and remain testable without I/O.

use crate::domain::payments::PaymentService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Payment order and verification use-cases.
    pub payments: PaymentService,
}

impl HttpState {
    /// Construct state from the payment service.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::payments::PaymentService;
    /// use backend::domain::ports::FixturePaymentGateway;
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let payments = PaymentService::new(Arc::new(FixturePaymentGateway), None);
    /// let _state = HttpState::new(payments);
    /// ```
    pub fn new(payments: PaymentService) -> Self {
        Self { payments }
    }
}
