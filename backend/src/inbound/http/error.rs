//! HTTP adapter mapping for domain failures.
//!
//! Purpose: keep the domain failure types HTTP-agnostic while letting Actix
//! handlers return them directly. Both render the same envelopes the error
//! middlewares write, so a handler error is well-formed even when a test wires
//! a handler without the middleware stack.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::{CorrelationId, DomainError, Failure, Fault};
use crate::middleware::{ErrorReply, fault_reply, public_face};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Failure>;

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status().as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        ErrorReply::from_domain(self).error_response()
    }
}

impl ResponseError for Fault {
    fn status_code(&self) -> StatusCode {
        public_face(self.kind()).0
    }

    fn error_response(&self) -> HttpResponse {
        fault_reply(self.kind(), CorrelationId::current_or_generate()).error_response()
    }
}

impl From<Failure> for actix_web::Error {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Domain(error) => error.into(),
            Failure::Fault(fault) => fault.into(),
        }
    }
}
