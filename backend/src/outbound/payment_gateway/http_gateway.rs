//! Reqwest-backed payment gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, basic
//! authentication, timeout and HTTP error mapping, and JSON decoding into
//! domain orders.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{CreateOrderDto, GatewayErrorDto, OrderDto};
use crate::domain::payments::{PaymentOrder, PaymentOrderRequest};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError};

/// API key pair issued by the gateway.
pub struct GatewayCredentials {
    /// Public key identifier.
    pub key_id: String,
    /// Private key secret; also used to verify payment signatures.
    pub key_secret: Zeroizing<String>,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpPaymentGatewayBuildError {
    /// The base URL cannot have path segments appended.
    #[error("payment gateway URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),
    /// The reqwest client could not be constructed.
    #[error("failed to build payment gateway HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Gateway adapter posting orders to `{base}/orders`.
pub struct HttpPaymentGateway {
    client: Client,
    endpoint: Url,
    credentials: GatewayCredentials,
}

impl HttpPaymentGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let gateway = HttpPaymentGateway::new(base_url, credentials, Duration::from_secs(10))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the base URL cannot carry a path or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: Url,
        credentials: GatewayCredentials,
        timeout: Duration,
    ) -> Result<Self, HttpPaymentGatewayBuildError> {
        let endpoint = orders_endpoint(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

fn orders_endpoint(base_url: Url) -> Result<Url, HttpPaymentGatewayBuildError> {
    let mut endpoint = base_url;
    let rendered = endpoint.to_string();
    endpoint
        .path_segments_mut()
        .map_err(|()| HttpPaymentGatewayBuildError::InvalidBaseUrl(rendered))?
        .pop_if_empty()
        .push("orders");
    Ok(endpoint)
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        debug!(endpoint = %self.endpoint, receipt = request.receipt(), "creating gateway order");
        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(
                self.credentials.key_id.as_str(),
                Some(self.credentials.key_secret.as_str()),
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&CreateOrderDto::from(request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_order(body.as_ref(), request)
    }
}

fn parse_order(
    body: &[u8],
    request: &PaymentOrderRequest,
) -> Result<PaymentOrder, PaymentGatewayError> {
    let decoded: OrderDto = serde_json::from_slice(body).map_err(|error| {
        PaymentGatewayError::decode(format!("invalid gateway order payload: {error}"))
    })?;
    decoded
        .into_domain(request)
        .map_err(PaymentGatewayError::decode)
}

fn map_transport_error(error: reqwest::Error) -> PaymentGatewayError {
    if error.is_timeout() {
        PaymentGatewayError::timeout(error.to_string())
    } else {
        PaymentGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PaymentGatewayError {
    let detail = serde_json::from_slice::<GatewayErrorDto>(body)
        .ok()
        .and_then(|dto| match (dto.error.code, dto.error.description) {
            (Some(code), Some(description)) => Some(format!("{code}: {description}")),
            (None, Some(description)) => Some(description),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PaymentGatewayError::timeout(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentGatewayError::transport(
            format!("gateway credentials rejected ({message})"),
        ),
        _ if status.is_client_error() => PaymentGatewayError::rejected(message),
        _ => PaymentGatewayError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
