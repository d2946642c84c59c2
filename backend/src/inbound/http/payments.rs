//! Payment API handlers.
//!
//! ```text
//! POST /api/v1/payments/orders {"amount":49900,"currency":"INR","receipt":"rcpt_1"}
//! POST /api/v1/payments/verify {"orderId":"order_1","paymentId":"pay_1","signature":"…"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ApiResult;
use super::enveloped::Enveloped;
use super::schemas::{ErrorEnvelopeSchema, PaymentOrderEnvelopeSchema, VerifyPaymentEnvelopeSchema};
use super::state::HttpState;
use crate::domain::DomainError;
use crate::domain::payments::{
    Currency, PaymentOrder, PaymentOrderRequest, VerifiedPayment, generate_receipt,
};

/// Currency assumed when the request omits one.
pub const DEFAULT_CURRENCY: Currency = Currency::Inr;

/// Order request body for `POST /api/v1/payments/orders`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Amount in minor units (paise, cents).
    #[schema(example = 49900)]
    pub amount: u64,
    /// ISO 4217 code; defaults to INR.
    #[serde(default)]
    #[schema(example = "INR")]
    pub currency: Option<String>,
    /// Merchant receipt reference; generated when absent.
    #[serde(default)]
    pub receipt: Option<String>,
}

impl TryFrom<CreateOrderRequest> for PaymentOrderRequest {
    type Error = DomainError;

    fn try_from(value: CreateOrderRequest) -> Result<Self, Self::Error> {
        let currency = match value.currency.as_deref() {
            None => DEFAULT_CURRENCY,
            Some(code) => Currency::from_code(code).ok_or_else(|| {
                DomainError::unprocessable(format!("Unsupported currency '{}'", code.trim()))
            })?,
        };
        let receipt = value
            .receipt
            .filter(|receipt| !receipt.trim().is_empty())
            .unwrap_or_else(generate_receipt);
        PaymentOrderRequest::new(value.amount, currency, receipt)
    }
}

/// Created order returned to the storefront checkout.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderResponse {
    /// Gateway order identifier passed to the checkout widget.
    #[schema(example = "order_9A33XWu170gUtm")]
    pub order_id: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 code.
    pub currency: String,
    /// Merchant receipt reference.
    pub receipt: String,
    /// Gateway-reported order status.
    #[schema(example = "created")]
    pub status: String,
}

impl From<PaymentOrder> for PaymentOrderResponse {
    fn from(order: PaymentOrder) -> Self {
        Self {
            order_id: order.id,
            amount: order.amount_minor,
            currency: order.currency.code().to_owned(),
            receipt: order.receipt,
            status: order.status,
        }
    }
}

/// Verification request body for `POST /api/v1/payments/verify`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyPaymentRequest {
    /// Gateway order identifier.
    pub order_id: String,
    /// Gateway payment identifier.
    pub payment_id: String,
    /// Hex HMAC-SHA256 signature returned by the checkout.
    pub signature: String,
}

/// Verified payment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    /// Gateway order identifier.
    pub order_id: String,
    /// Gateway payment identifier.
    pub payment_id: String,
    /// Always true; mismatches are reported as errors.
    pub verified: bool,
}

impl From<VerifiedPayment> for VerifyPaymentResponse {
    fn from(payment: VerifiedPayment) -> Self {
        Self {
            order_id: payment.order_id,
            payment_id: payment.payment_id,
            verified: true,
        }
    }
}

/// Register a payment order with the gateway.
#[utoipa::path(
    post,
    path = "/api/v1/payments/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = PaymentOrderEnvelopeSchema),
        (status = 400, description = "Invalid order", body = ErrorEnvelopeSchema),
        (status = 422, description = "Unsupported currency", body = ErrorEnvelopeSchema),
        (status = 501, description = "Payment gateway not configured", body = ErrorEnvelopeSchema),
        (status = 502, description = "Payment gateway rejected the order", body = ErrorEnvelopeSchema)
    ),
    tags = ["payments"],
    operation_id = "createPaymentOrder"
)]
#[post("/payments/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<Enveloped<PaymentOrderResponse>> {
    let request = PaymentOrderRequest::try_from(payload.into_inner())?;
    let order = state.payments.create_order(request).await?;
    Ok(Enveloped::created(PaymentOrderResponse::from(order)).with_message("Payment order created"))
}

/// Verify the gateway signature of a completed payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Signature verified", body = VerifyPaymentEnvelopeSchema),
        (status = 400, description = "Missing field or signature mismatch", body = ErrorEnvelopeSchema),
        (status = 501, description = "Verification secret not configured", body = ErrorEnvelopeSchema)
    ),
    tags = ["payments"],
    operation_id = "verifyPayment"
)]
#[post("/payments/verify")]
pub async fn verify_payment(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyPaymentRequest>,
) -> ApiResult<Enveloped<VerifyPaymentResponse>> {
    let body = payload.into_inner();
    let verified = state
        .payments
        .verify_payment(&body.order_id, &body.payment_id, &body.signature)?;
    Ok(Enveloped::ok(VerifyPaymentResponse::from(verified)))
}
