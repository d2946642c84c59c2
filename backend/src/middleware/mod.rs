//! Request middleware.
//!
//! Purpose: Define middleware for request lifecycle concerns: correlation of
//! logs and replies, and the two-stage error pipeline. Register them so that
//! [`DomainErrorPropagation`] runs innermost, [`FaultBarrier`] wraps it and
//! [`CorrelationScope`] wraps both.

pub mod correlation;
pub mod domain_errors;
pub mod fault_barrier;
pub mod reply;

pub use correlation::CorrelationScope;
pub use domain_errors::DomainErrorPropagation;
pub use fault_barrier::{FaultBarrier, classify, fault_reply, public_face};
pub use reply::ErrorReply;
