//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: health probes and payment endpoints from the inbound layer
//! - **Schemas**: envelope wrappers that describe the uniform
//!   `{info, data, id}` body every endpoint returns
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::payments::{
    CreateOrderRequest, PaymentOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::inbound::http::schemas::{
    ErrorEnvelopeSchema, PaymentOrderEnvelopeSchema, ProbeEnvelopeSchema, ResponseInfoSchema,
    VerifyPaymentEnvelopeSchema,
};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Storefront HTTP interface. Every response, success or failure, is wrapped in the same envelope; failures carry a correlation id in `id` and the `X-Correlation-ID` header.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::payments::create_order,
        crate::inbound::http::payments::verify_payment,
    ),
    components(schemas(
        ResponseInfoSchema,
        ErrorEnvelopeSchema,
        ProbeEnvelopeSchema,
        PaymentOrderEnvelopeSchema,
        VerifyPaymentEnvelopeSchema,
        ProbeStatus,
        CreateOrderRequest,
        PaymentOrderResponse,
        VerifyPaymentRequest,
        VerifyPaymentResponse,
    )),
    tags(
        (name = "payments", description = "Payment gateway orders and signature verification"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
