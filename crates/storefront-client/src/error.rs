//! Typed failures surfaced by [`ApiClient`](crate::ApiClient).
//!
//! Every failure a call can produce is normalised into [`ClientError`] before
//! it reaches the caller; raw transport errors never escape.

use std::fmt;

use thiserror::Error;

/// Status reported for failures that never produced an HTTP response.
pub const TRANSPORT_STATUS: u16 = 0;

/// What the client knows about a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// Human-readable message, taken from the envelope when one was returned.
    pub message: String,
    /// HTTP status, or [`TRANSPORT_STATUS`] when no response arrived.
    pub status: u16,
    /// Correlation id the user can quote to support.
    pub correlation_id: Option<String>,
}

impl ErrorDetails {
    /// Bundle the details of a failure.
    #[must_use]
    pub fn new(message: impl Into<String>, status: u16, correlation_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            status,
            correlation_id,
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Failure of a single API call.
///
/// # Examples
/// ```
/// use storefront_client::{ClientError, ErrorDetails};
///
/// let err = ClientError::Conflict(ErrorDetails::new("Email already registered", 409, None));
/// assert_eq!(err.code(), "CONFLICT_ERROR");
/// assert_eq!(err.status(), 409);
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server rejected the input (400, 422).
    #[error("{0}")]
    Validation(ErrorDetails),
    /// The caller is not authenticated (401).
    #[error("{0}")]
    Authentication(ErrorDetails),
    /// The caller may not perform the operation (403).
    #[error("{0}")]
    Authorization(ErrorDetails),
    /// The resource does not exist (404).
    #[error("{0}")]
    NotFound(ErrorDetails),
    /// The request conflicts with current state (409).
    #[error("{0}")]
    Conflict(ErrorDetails),
    /// Too many requests (429).
    #[error("{0}")]
    RateLimit(ErrorDetails),
    /// No usable response arrived: connection failure or client-side timeout.
    #[error("{0}")]
    Network(ErrorDetails),
    /// The server reported a request timeout (408).
    #[error("{0}")]
    Timeout(ErrorDetails),
    /// Any other server-reported failure, including 2xx failure envelopes.
    #[error("{0}")]
    Server(ErrorDetails),
    /// The response could not be interpreted.
    #[error("{0}")]
    Unknown(ErrorDetails),
}

impl ClientError {
    /// Classify a non-2xx status.
    ///
    /// The mapping depends on the status alone, so the same status always
    /// yields the same variant. A server-reported 408 is [`Self::Timeout`]
    /// rather than [`Self::Server`]; client-side timeouts never reach this
    /// mapping and surface as [`Self::Network`].
    #[must_use]
    pub const fn from_status(status: u16, details: ErrorDetails) -> Self {
        match status {
            400 | 422 => Self::Validation(details),
            401 => Self::Authentication(details),
            403 => Self::Authorization(details),
            404 => Self::NotFound(details),
            408 => Self::Timeout(details),
            409 => Self::Conflict(details),
            429 => Self::RateLimit(details),
            _ => Self::Server(details),
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Authentication(_) => "AUTHENTICATION_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND_ERROR",
            Self::Conflict(_) => "CONFLICT_ERROR",
            Self::RateLimit(_) => "RATE_LIMIT_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Timeout(_) => "TIMEOUT_ERROR",
            Self::Server(_) => "SERVER_ERROR",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Shared details of the failure.
    #[must_use]
    pub const fn details(&self) -> &ErrorDetails {
        match self {
            Self::Validation(details)
            | Self::Authentication(details)
            | Self::Authorization(details)
            | Self::NotFound(details)
            | Self::Conflict(details)
            | Self::RateLimit(details)
            | Self::Network(details)
            | Self::Timeout(details)
            | Self::Server(details)
            | Self::Unknown(details) => details,
        }
    }

    /// HTTP status, or [`TRANSPORT_STATUS`] for transport failures.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.details().status
    }

    /// Message suitable for showing to the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.details().message
    }

    /// Correlation id reported by the server, if any.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.details().correlation_id.as_deref()
    }

    /// Whether the call may be attempted again. Only network failures are.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors raised while building an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The base URL cannot be used to resolve endpoint paths.
    #[error("base URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
