//! Catch-all translation of unanticipated failures.
//!
//! [`FaultBarrier`] sits outside [`DomainErrorPropagation`] and turns every
//! remaining failure into one of a fixed set of generic envelopes. It looks at
//! errors attached to responses, errors returned by the inner service and
//! panics raised while handling the request. The original error text is
//! logged with the request's correlation id and never written to the client.
//!
//! [`DomainErrorPropagation`]: super::DomainErrorPropagation

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::{
    InternalError, JsonPayloadError, PathError, QueryPayloadError, UrlencodedError,
};
use actix_web::http::StatusCode;
use actix_web::{Error, ResponseError};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, warn};

use super::ErrorReply;
use crate::domain::{CorrelationId, Fault, FaultKind};

/// Status and client-facing message for each fault kind.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use backend::domain::FaultKind;
/// use backend::middleware::public_face;
///
/// assert_eq!(
///     public_face(FaultKind::Timeout),
///     (StatusCode::REQUEST_TIMEOUT, "Request timeout")
/// );
/// ```
pub fn public_face(kind: FaultKind) -> (StatusCode, &'static str) {
    match kind {
        FaultKind::InvalidArgument => (StatusCode::BAD_REQUEST, "Invalid input parameters"),
        FaultKind::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access"),
        FaultKind::NotFound => (StatusCode::NOT_FOUND, "Resource not found"),
        FaultKind::InvalidOperation => (StatusCode::BAD_REQUEST, "Invalid operation"),
        FaultKind::Timeout => (StatusCode::REQUEST_TIMEOUT, "Request timeout"),
        FaultKind::NotImplemented => (StatusCode::NOT_IMPLEMENTED, "Feature not implemented"),
        FaultKind::Unexpected => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An internal server error occurred",
        ),
    }
}

/// Generic reply for a fault kind, tagged with the given correlation id.
pub fn fault_reply(kind: FaultKind, correlation_id: CorrelationId) -> ErrorReply {
    let (status, message) = public_face(kind);
    ErrorReply::new(status, message, correlation_id)
}

/// Classify an actix error into a [`FaultKind`].
///
/// The first matching rule wins: faults keep their own kind, extractor
/// failures (including actix's default 404 wrapping of path errors) are
/// invalid arguments, I/O timeouts are timeouts, then the
/// error's declared status decides, and everything else is unexpected.
pub fn classify(error: &Error) -> FaultKind {
    if let Some(fault) = error.as_error::<Fault>() {
        return fault.kind();
    }
    if error.as_error::<JsonPayloadError>().is_some()
        || error.as_error::<QueryPayloadError>().is_some()
        || error.as_error::<PathError>().is_some()
        || error.as_error::<InternalError<PathError>>().is_some()
        || error.as_error::<UrlencodedError>().is_some()
    {
        return FaultKind::InvalidArgument;
    }
    if let Some(io) = error.as_error::<std::io::Error>()
        && io.kind() == std::io::ErrorKind::TimedOut
    {
        return FaultKind::Timeout;
    }
    match error.as_response_error().status_code() {
        StatusCode::BAD_REQUEST => FaultKind::InvalidArgument,
        StatusCode::UNAUTHORIZED => FaultKind::Unauthorized,
        StatusCode::NOT_FOUND => FaultKind::NotFound,
        StatusCode::REQUEST_TIMEOUT => FaultKind::Timeout,
        StatusCode::NOT_IMPLEMENTED => FaultKind::NotImplemented,
        _ => FaultKind::Unexpected,
    }
}

/// Request details carried into log records.
struct RequestLine {
    method: String,
    path: String,
}

impl RequestLine {
    fn log(&self, kind: FaultKind, correlation_id: &CorrelationId, detail: &str) {
        let RequestLine { method, path } = self;
        if kind == FaultKind::Unexpected {
            error!(%correlation_id, ?kind, %method, %path, %detail, "request failed");
        } else {
            warn!(%correlation_id, ?kind, %method, %path, %detail, "request failed");
        }
    }

    /// Reply for an error, or `None` when the error is already rendered.
    fn reply_for(&self, error: &Error) -> Option<ErrorReply> {
        if error.as_error::<ErrorReply>().is_some() {
            return None;
        }
        let kind = classify(error);
        let correlation_id = CorrelationId::current_or_generate();
        self.log(kind, &correlation_id, &error.to_string());
        Some(fault_reply(kind, correlation_id))
    }

    fn reply_for_panic(&self, payload: &(dyn Any + Send)) -> ErrorReply {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        let correlation_id = CorrelationId::current_or_generate();
        self.log(
            FaultKind::Unexpected,
            &correlation_id,
            &format!("panic: {detail}"),
        );
        fault_reply(FaultKind::Unexpected, correlation_id)
    }
}

/// Middleware translating unanticipated failures into generic envelopes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::{CorrelationScope, DomainErrorPropagation, FaultBarrier};
///
/// let app = App::new()
///     .wrap(DomainErrorPropagation)
///     .wrap(FaultBarrier)
///     .wrap(CorrelationScope);
/// ```
#[derive(Clone)]
pub struct FaultBarrier;

impl<S, B> Transform<S, ServiceRequest> for FaultBarrier
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = FaultBarrierMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FaultBarrierMiddleware { service }))
    }
}

/// Service wrapper produced by [`FaultBarrier`].
pub struct FaultBarrierMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FaultBarrierMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let line = RequestLine {
            method: req.method().to_string(),
            path: req.path().to_owned(),
        };
        let called = panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));
        Box::pin(async move {
            let outcome = match called {
                Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                Err(payload) => Err(payload),
            };
            match outcome {
                Ok(Ok(res)) => {
                    let reply = res.response().error().and_then(|err| line.reply_for(err));
                    match reply {
                        Some(reply) => {
                            let (request, _) = res.into_parts();
                            Ok(ServiceResponse::new(request, reply.error_response()))
                        }
                        None => Ok(res.map_into_boxed_body()),
                    }
                }
                // The request was consumed by the inner service, so the reply
                // travels as an error that renders itself.
                Ok(Err(err)) => match line.reply_for(&err) {
                    Some(reply) => Err(reply.into()),
                    None => Err(err),
                },
                Err(payload) => Err(line.reply_for_panic(payload.as_ref()).into()),
            }
        })
    }
}

#[cfg(test)]
mod tests;
