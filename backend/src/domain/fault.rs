//! Unanticipated runtime faults.
//!
//! A [`Fault`] describes *what kind* of thing went wrong without deciding how
//! clients see it. Inbound adapters classify faults by [`FaultKind`] and answer
//! with a fixed, generic message; the fault's own text only reaches the logs.

use std::error::Error as StdError;

/// Classification bucket for a [`Fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// An argument was malformed, out of range or missing.
    InvalidArgument,
    /// The caller is not authenticated.
    Unauthorized,
    /// The addressed resource does not exist.
    NotFound,
    /// The operation is not valid in the current state.
    InvalidOperation,
    /// The operation did not complete in time.
    Timeout,
    /// The operation is not available in this deployment.
    NotImplemented,
    /// Anything else.
    Unexpected,
}

/// Runtime fault raised while handling a request.
///
/// # Examples
/// ```
/// use backend::domain::{Fault, FaultKind};
///
/// let fault = Fault::argument_null("paymentId");
/// assert_eq!(fault.kind(), FaultKind::InvalidArgument);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    /// An argument was malformed or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A required argument was missing or blank.
    #[error("required argument `{0}` was missing")]
    ArgumentNull(String),
    /// The caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The operation is not valid in the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The operation did not complete in time.
    #[error("timed out: {0}")]
    Timeout(String),
    /// The operation is not available in this deployment.
    #[error("not implemented: {0}")]
    NotImplemented(String),
    /// Any other failure, keeping its source for diagnostics.
    #[error(transparent)]
    Unexpected(Box<dyn StdError + Send + Sync + 'static>),
}

impl Fault {
    /// Classification bucket for this fault.
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::InvalidArgument(_) | Self::ArgumentNull(_) => FaultKind::InvalidArgument,
            Self::Unauthorized(_) => FaultKind::Unauthorized,
            Self::NotFound(_) => FaultKind::NotFound,
            Self::InvalidOperation(_) => FaultKind::InvalidOperation,
            Self::Timeout(_) => FaultKind::Timeout,
            Self::NotImplemented(_) => FaultKind::NotImplemented,
            Self::Unexpected(_) => FaultKind::Unexpected,
        }
    }

    /// Convenience constructor for [`Fault::InvalidArgument`].
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        Self::InvalidArgument(detail.into())
    }

    /// Convenience constructor for [`Fault::ArgumentNull`].
    pub fn argument_null(name: impl Into<String>) -> Self {
        Self::ArgumentNull(name.into())
    }

    /// Convenience constructor for [`Fault::Unauthorized`].
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized(detail.into())
    }

    /// Convenience constructor for [`Fault::NotFound`].
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }

    /// Convenience constructor for [`Fault::InvalidOperation`].
    pub fn invalid_operation(detail: impl Into<String>) -> Self {
        Self::InvalidOperation(detail.into())
    }

    /// Convenience constructor for [`Fault::Timeout`].
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::Timeout(detail.into())
    }

    /// Convenience constructor for [`Fault::NotImplemented`].
    pub fn not_implemented(detail: impl Into<String>) -> Self {
        Self::NotImplemented(detail.into())
    }

    /// Wrap any error as [`Fault::Unexpected`].
    pub fn unexpected<E>(source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self::Unexpected(source.into())
    }
}

/// Require a non-blank string argument, raising [`Fault::ArgumentNull`].
///
/// # Examples
/// ```
/// use backend::domain::fault::require_non_blank;
///
/// assert_eq!(require_non_blank("orderId", " order_1 ").ok(), Some("order_1"));
/// assert!(require_non_blank("orderId", "  ").is_err());
/// ```
pub fn require_non_blank<'a>(name: &str, value: &'a str) -> Result<&'a str, Fault> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Fault::argument_null(name))
    } else {
        Ok(trimmed)
    }
}
