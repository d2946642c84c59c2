//! Domain primitives and use-cases.
//!
//! Purpose: Define the failure vocabulary shared by every request and the
//! payment use-cases the storefront exposes. Types here know nothing about
//! HTTP; inbound adapters decide how each failure is rendered.
//!
//! Public surface:
//! - CorrelationId: per-request identifier carried through logs and replies.
//! - DomainError: deliberate business-rule failure with its own status.
//! - Fault: unanticipated failure classified by [`FaultKind`].
//! - Failure: what domain services return, one of the two above.

pub mod correlation_id;
pub mod error;
pub mod fault;
pub mod payments;
pub mod ports;

pub use self::correlation_id::{CorrelationId, CorrelationIdError};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorStatus, Failure};
pub use self::fault::{Fault, FaultKind};
