//! Domain-level error types.
//!
//! [`DomainError`] is raised deliberately when a business rule is violated. It
//! carries its own target status and correlation identifier, and its message
//! is authored for clients. Inbound adapters serialise it verbatim into the
//! response envelope, unlike [`Fault`], whose text never leaves the server.

use super::{CorrelationId, Fault};

/// HTTP status pre-assigned to a [`DomainError`].
///
/// Only client (4xx) and server (5xx) error statuses are representable.
///
/// # Examples
/// ```
/// use backend::domain::ErrorStatus;
///
/// assert_eq!(ErrorStatus::try_from(404_u16).map(ErrorStatus::as_u16), Ok(404));
/// assert!(ErrorStatus::try_from(200_u16).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorStatus(u16);

impl ErrorStatus {
    /// 400 Bad Request.
    pub const BAD_REQUEST: Self = Self(400);
    /// 401 Unauthorized.
    pub const UNAUTHORIZED: Self = Self(401);
    /// 403 Forbidden.
    pub const FORBIDDEN: Self = Self(403);
    /// 404 Not Found.
    pub const NOT_FOUND: Self = Self(404);
    /// 409 Conflict.
    pub const CONFLICT: Self = Self(409);
    /// 422 Unprocessable Entity.
    pub const UNPROCESSABLE: Self = Self(422);
    /// 500 Internal Server Error.
    pub const INTERNAL: Self = Self(500);
    /// 502 Bad Gateway.
    pub const BAD_GATEWAY: Self = Self(502);
    /// 503 Service Unavailable.
    pub const SERVICE_UNAVAILABLE: Self = Self(503);

    /// Numeric status code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Whether the status reports a server-side failure.
    pub fn is_server_error(self) -> bool {
        self.0 >= 500
    }
}

impl TryFrom<u16> for ErrorStatus {
    type Error = DomainErrorValidationError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (400..=599).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainErrorValidationError::NonErrorStatus(value))
        }
    }
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainErrorValidationError {
    /// The message is empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The status is outside 400..=599.
    #[error("status {0} is not an error status")]
    NonErrorStatus(u16),
}

/// Business-rule failure carrying its own status and correlation identifier.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `status` is always a 4xx or 5xx code.
///
/// # Examples
/// ```
/// use backend::domain::{CorrelationId, DomainError, ErrorStatus};
///
/// let id = CorrelationId::parse("abc-123").expect("valid id");
/// let err = DomainError::not_found("order does not exist").with_correlation_id(id);
/// assert_eq!(err.status(), ErrorStatus::NOT_FOUND);
/// assert_eq!(err.correlation_id().as_str(), "abc-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    status: ErrorStatus,
    message: String,
    correlation_id: CorrelationId,
}

impl DomainError {
    /// Create a new error, panicking if the message is blank.
    ///
    /// Captures the in-scope [`CorrelationId`], or generates one when called
    /// outside a request.
    ///
    /// # Panics
    ///
    /// Panics when `message` is blank; use [`Self::try_new`] for untrusted
    /// text.
    pub fn new(status: ErrorStatus, message: impl Into<String>) -> Self {
        match Self::try_new(status, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        status: ErrorStatus,
        message: impl Into<String>,
    ) -> Result<Self, DomainErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DomainErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            status,
            message,
            correlation_id: CorrelationId::current_or_generate(),
        })
    }

    /// Replace the correlation identifier.
    #[must_use]
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = id;
        self
    }

    /// Target HTTP status.
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier reported to the client and written to logs.
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Convenience constructor for [`ErrorStatus::BAD_REQUEST`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::BAD_REQUEST, message)
    }

    /// Convenience constructor for [`ErrorStatus::UNAUTHORIZED`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::UNAUTHORIZED, message)
    }

    /// Convenience constructor for [`ErrorStatus::FORBIDDEN`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::FORBIDDEN, message)
    }

    /// Convenience constructor for [`ErrorStatus::NOT_FOUND`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::NOT_FOUND, message)
    }

    /// Convenience constructor for [`ErrorStatus::CONFLICT`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::CONFLICT, message)
    }

    /// Convenience constructor for [`ErrorStatus::UNPROCESSABLE`].
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::UNPROCESSABLE, message)
    }

    /// Convenience constructor for [`ErrorStatus::INTERNAL`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::INTERNAL, message)
    }

    /// Convenience constructor for [`ErrorStatus::BAD_GATEWAY`].
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::BAD_GATEWAY, message)
    }

    /// Convenience constructor for [`ErrorStatus::SERVICE_UNAVAILABLE`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorStatus::SERVICE_UNAVAILABLE, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

/// Failure returned by domain services: either deliberate or unanticipated.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// A business rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Something went wrong that the caller should not see the details of.
    #[error(transparent)]
    Fault(#[from] Fault),
}
