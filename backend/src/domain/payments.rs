//! Payment orders and signature verification.
//!
//! A thin layer over the external gateway: the storefront registers an order,
//! the customer pays in the gateway's checkout, and the gateway hands back a
//! signature over `"{order_id}|{payment_id}"` that we verify with the shared
//! key secret before trusting the payment.
//!
//! Every failure leaves here as a [`Failure`]: business-rule violations as
//! [`DomainError`] with an authored message, anything else as a [`Fault`].

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::fault::require_non_blank;
use super::ports::{PaymentGateway, PaymentGatewayError};
use super::{DomainError, Failure, Fault};

type HmacSha256 = Hmac<Sha256>;

/// Longest receipt reference the gateway accepts.
pub const RECEIPT_MAX_LEN: usize = 40;

/// Message returned when a payment signature does not match.
pub const SIGNATURE_MISMATCH_MESSAGE: &str = "Payment signature verification failed";

/// Currencies the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Indian rupee.
    Inr,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    /// Parse an ISO 4217 code, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::payments::Currency;
    ///
    /// assert_eq!(Currency::from_code(" inr "), Some(Currency::Inr));
    /// assert_eq!(Currency::from_code("XYZ"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "INR" => Some(Self::Inr),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Validated order request sent to the gateway.
///
/// ## Invariants
/// - `amount_minor` is positive (minor units, e.g. paise or cents).
/// - `receipt` is non-blank and at most [`RECEIPT_MAX_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrderRequest {
    amount_minor: u64,
    currency: Currency,
    receipt: String,
}

impl PaymentOrderRequest {
    /// Validate the order parameters.
    pub fn new(
        amount_minor: u64,
        currency: Currency,
        receipt: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if amount_minor == 0 {
            return Err(DomainError::invalid_request(
                "amount must be greater than zero",
            ));
        }
        let receipt = receipt.into().trim().to_owned();
        if receipt.is_empty() {
            return Err(DomainError::invalid_request("receipt must not be empty"));
        }
        if receipt.chars().count() > RECEIPT_MAX_LEN {
            return Err(DomainError::invalid_request(format!(
                "receipt must be at most {RECEIPT_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            amount_minor,
            currency,
            receipt,
        })
    }

    /// Amount in minor units.
    pub fn amount_minor(&self) -> u64 {
        self.amount_minor
    }

    /// Order currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Merchant receipt reference.
    pub fn receipt(&self) -> &str {
        self.receipt.as_str()
    }
}

/// Generate a receipt reference for orders submitted without one.
pub fn generate_receipt() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("rcpt_{}", id.get(..16).unwrap_or(id.as_str()))
}

/// Order registered with the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    /// Gateway order identifier.
    pub id: String,
    /// Amount in minor units.
    pub amount_minor: u64,
    /// Order currency.
    pub currency: Currency,
    /// Merchant receipt reference.
    pub receipt: String,
    /// Gateway-reported order status.
    pub status: String,
}

/// Payment whose signature has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    /// Gateway order identifier.
    pub order_id: String,
    /// Gateway payment identifier.
    pub payment_id: String,
}

/// HMAC-SHA256 signer keyed with the gateway key secret.
pub struct SignatureVerifier {
    secret: Zeroizing<String>,
}

impl SignatureVerifier {
    /// Build a verifier for the given key secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
        }
    }

    fn mac(&self, order_id: &str, payment_id: &str) -> Result<HmacSha256, Fault> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| Fault::unexpected("payment signature key rejected by HMAC"))?;
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());
        Ok(mac)
    }

    /// Hex-encoded signature the gateway is expected to send.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::payments::SignatureVerifier;
    ///
    /// let verifier = SignatureVerifier::new("secret");
    /// let signature = verifier.sign("order_1", "pay_1").expect("signs");
    /// assert!(verifier.verify("order_1", "pay_1", &signature).expect("verifies"));
    /// assert!(!verifier.verify("order_1", "pay_2", &signature).expect("verifies"));
    /// ```
    pub fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, Fault> {
        let mac = self.mac(order_id, payment_id)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex-encoded signature.
    ///
    /// Malformed hex is treated as a mismatch.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> Result<bool, Fault> {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return Ok(false);
        };
        let mac = self.mac(order_id, payment_id)?;
        Ok(mac.verify_slice(&expected).is_ok())
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Use-case service behind the payment endpoints.
#[derive(Clone)]
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    verifier: Option<Arc<SignatureVerifier>>,
}

impl PaymentService {
    /// Build the service; without a verifier, verification is unavailable.
    pub fn new(gateway: Arc<dyn PaymentGateway>, verifier: Option<SignatureVerifier>) -> Self {
        Self {
            gateway,
            verifier: verifier.map(Arc::new),
        }
    }

    /// Register an order with the gateway.
    pub async fn create_order(&self, request: PaymentOrderRequest) -> Result<PaymentOrder, Failure> {
        let order = self
            .gateway
            .create_order(&request)
            .await
            .map_err(map_gateway_error)?;
        info!(
            order_id = %order.id,
            amount_minor = order.amount_minor,
            currency = %order.currency,
            "payment order created"
        );
        Ok(order)
    }

    /// Check the gateway signature for a completed payment.
    pub fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<VerifiedPayment, Failure> {
        let order_id = require_non_blank("orderId", order_id)?;
        let payment_id = require_non_blank("paymentId", payment_id)?;
        let signature = require_non_blank("signature", signature)?;
        let verifier = self
            .verifier
            .as_ref()
            .ok_or_else(|| Fault::not_implemented("payment verification secret is not configured"))?;

        if !verifier.verify(order_id, payment_id, signature)? {
            warn!(order_id, payment_id, "payment signature mismatch");
            return Err(DomainError::invalid_request(SIGNATURE_MISMATCH_MESSAGE).into());
        }
        info!(order_id, payment_id, "payment signature verified");
        Ok(VerifiedPayment {
            order_id: order_id.to_owned(),
            payment_id: payment_id.to_owned(),
        })
    }
}

fn map_gateway_error(error: PaymentGatewayError) -> Failure {
    match error {
        PaymentGatewayError::Rejected { message } => {
            warn!(%message, "payment gateway rejected order");
            DomainError::bad_gateway("Payment gateway rejected the order").into()
        }
        PaymentGatewayError::Timeout { message } => Fault::timeout(message).into(),
        PaymentGatewayError::Unconfigured => {
            Fault::not_implemented("payment gateway is not configured").into()
        }
        other @ (PaymentGatewayError::Transport { .. } | PaymentGatewayError::Decode { .. }) => {
            Fault::unexpected(other).into()
        }
    }
}
