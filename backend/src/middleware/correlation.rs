//! Correlation middleware attaching a request-scoped [`CorrelationId`].
//!
//! A valid `X-Correlation-ID` request header is adopted as the request's id so
//! client and server logs line up; otherwise a fresh UUID is generated. The id
//! is echoed in the response header unless an inner layer already set one,
//! such as a domain error carrying its own id.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use envelope::CORRELATION_ID_HEADER;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::CorrelationId;

/// Middleware scoping every request to a [`CorrelationId`].
///
/// Handlers read the id via [`CorrelationId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::CorrelationScope;
///
/// let app = App::new().wrap(CorrelationScope);
/// ```
#[derive(Clone)]
pub struct CorrelationScope;

impl<S, B> Transform<S, ServiceRequest> for CorrelationScope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationScopeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationScopeMiddleware { service }))
    }
}

/// Service wrapper produced by [`CorrelationScope`].
pub struct CorrelationScopeMiddleware<S> {
    service: S,
}

fn incoming_id(req: &ServiceRequest) -> Option<CorrelationId> {
    let raw = req.headers().get(CORRELATION_ID_HEADER)?;
    let parsed = raw
        .to_str()
        .ok()
        .and_then(|text| CorrelationId::parse(text).ok());
    if parsed.is_none() {
        debug!(path = %req.path(), "ignoring malformed correlation id header");
    }
    parsed
}

impl<S, B> Service<ServiceRequest> for CorrelationScopeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let correlation_id = incoming_id(&req).unwrap_or_else(CorrelationId::generate);
        let fut = CorrelationId::sync_scope(correlation_id.clone(), || self.service.call(req));
        Box::pin(CorrelationId::scope(correlation_id.clone(), async move {
            let mut res = fut.await?;
            let header = HeaderName::from_static("x-correlation-id");
            if res.headers().contains_key(&header) {
                return Ok(res);
            }
            match HeaderValue::from_str(correlation_id.as_str()) {
                Ok(value) => {
                    res.response_mut().headers_mut().insert(header, value);
                }
                Err(err) => {
                    error!(
                        error = %err,
                        correlation_id = %correlation_id,
                        "failed to encode correlation id header"
                    );
                }
            }
            Ok(res)
        }))
    }
}
