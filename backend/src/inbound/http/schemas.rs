//! OpenAPI schema definitions for the response envelope.
//!
//! The envelope types live in the shared `envelope` crate, which stays free of
//! framework dependencies. This module provides the schema definitions
//! required for OpenAPI documentation; each wrapper mirrors the JSON the
//! envelope serialises to.

use utoipa::ToSchema;

use super::health::ProbeStatus;
use super::payments::{PaymentOrderResponse, VerifyPaymentResponse};

/// OpenAPI schema for `envelope::ResponseInfo`.
#[derive(ToSchema)]
#[schema(as = ResponseInfo, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ResponseInfoSchema {
    /// True exactly when the HTTP status is 2xx.
    is_success: bool,
    /// Decimal HTTP status.
    #[schema(example = "400")]
    code: String,
    /// Human-readable message safe to show to users.
    #[schema(example = "Invalid input parameters")]
    message: String,
}

/// Error envelope: `data` is always null.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// Outcome metadata.
    info: ResponseInfoSchema,
    /// Always null for failures.
    data: Option<serde_json::Value>,
    /// Correlation identifier to quote when reporting the failure.
    #[schema(example = "1718000000000-k3j9x0a1b")]
    id: Option<String>,
}

/// Success envelope around a probe result.
#[derive(ToSchema)]
#[schema(as = ProbeEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProbeEnvelopeSchema {
    /// Outcome metadata.
    info: ResponseInfoSchema,
    /// Probe payload.
    data: ProbeStatus,
    /// Correlation identifier of the request.
    id: Option<String>,
}

/// Success envelope around a created payment order.
#[derive(ToSchema)]
#[schema(as = PaymentOrderEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaymentOrderEnvelopeSchema {
    /// Outcome metadata.
    info: ResponseInfoSchema,
    /// Created order.
    data: PaymentOrderResponse,
    /// Correlation identifier of the request.
    id: Option<String>,
}

/// Success envelope around a verified payment.
#[derive(ToSchema)]
#[schema(as = VerifyPaymentEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct VerifyPaymentEnvelopeSchema {
    /// Outcome metadata.
    info: ResponseInfoSchema,
    /// Verification result.
    data: VerifyPaymentResponse,
    /// Correlation identifier of the request.
    id: Option<String>,
}
