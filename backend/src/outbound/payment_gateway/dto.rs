//! DTOs for the gateway's order API.
//!
//! The adapter encodes requests from and decodes responses into these
//! transport DTOs, then maps them onto domain records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::payments::{Currency, PaymentOrder, PaymentOrderRequest};

#[derive(Debug, Serialize)]
pub(super) struct CreateOrderDto<'a> {
    pub(super) amount: u64,
    pub(super) currency: &'static str,
    pub(super) receipt: &'a str,
}

impl<'a> From<&'a PaymentOrderRequest> for CreateOrderDto<'a> {
    fn from(request: &'a PaymentOrderRequest) -> Self {
        Self {
            amount: request.amount_minor(),
            currency: request.currency().code(),
            receipt: request.receipt(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderDto {
    pub(super) id: String,
    pub(super) amount: u64,
    pub(super) currency: String,
    #[serde(default)]
    pub(super) receipt: Option<String>,
    pub(super) status: String,
}

impl OrderDto {
    /// Map onto the domain order, falling back to the request's receipt.
    pub(super) fn into_domain(self, request: &PaymentOrderRequest) -> Result<PaymentOrder, String> {
        let currency = Currency::from_code(&self.currency)
            .ok_or_else(|| format!("unknown currency '{}' in gateway order", self.currency))?;
        if self.id.trim().is_empty() {
            return Err("gateway order is missing its id".to_owned());
        }
        Ok(PaymentOrder {
            id: self.id,
            amount_minor: self.amount,
            currency,
            receipt: self
                .receipt
                .unwrap_or_else(|| request.receipt().to_owned()),
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GatewayErrorDto {
    pub(super) error: GatewayErrorDetailDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GatewayErrorDetailDto {
    #[serde(default)]
    pub(super) code: Option<String>,
    #[serde(default)]
    pub(super) description: Option<String>,
}
