//! Propagation of deliberately raised [`DomainError`]s.
//!
//! Installed innermost. A response carrying a [`DomainError`] is rewritten as
//! an error envelope with the error's own status, message and correlation id.
//! Every other response passes through untouched so the outer
//! [`FaultBarrier`](super::FaultBarrier) can classify it.

use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, warn};

use super::ErrorReply;
use crate::domain::DomainError;

/// Middleware serialising [`DomainError`]s into error envelopes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::middleware::DomainErrorPropagation;
///
/// let app = App::new().wrap(DomainErrorPropagation);
/// ```
#[derive(Clone)]
pub struct DomainErrorPropagation;

impl<S, B> Transform<S, ServiceRequest> for DomainErrorPropagation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = DomainErrorPropagationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DomainErrorPropagationMiddleware { service }))
    }
}

/// Service wrapper produced by [`DomainErrorPropagation`].
pub struct DomainErrorPropagationMiddleware<S> {
    service: S,
}

fn log_domain_error(error: &DomainError, method: &str, path: &str) {
    let status = error.status().as_u16();
    if error.status().is_server_error() {
        error!(
            correlation_id = %error.correlation_id(),
            status,
            method,
            path,
            detail = error.message(),
            "domain error"
        );
    } else {
        warn!(
            correlation_id = %error.correlation_id(),
            status,
            method,
            path,
            detail = error.message(),
            "domain error"
        );
    }
}

impl<S, B> Service<ServiceRequest> for DomainErrorPropagationMiddleware<S>
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
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let reply = res
                        .response()
                        .error()
                        .and_then(|err| err.as_error::<DomainError>())
                        .map(|domain| {
                            log_domain_error(domain, &method, &path);
                            ErrorReply::from_domain(domain)
                        });
                    match reply {
                        Some(reply) => {
                            let (request, _) = res.into_parts();
                            Ok(ServiceResponse::new(request, reply.error_response()))
                        }
                        None => Ok(res.map_into_boxed_body()),
                    }
                }
                Err(err) => match err.as_error::<DomainError>() {
                    Some(domain) => {
                        log_domain_error(domain, &method, &path);
                        Err(ErrorReply::from_domain(domain).into())
                    }
                    None => Err(err),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CorrelationId, Fault};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use envelope::CORRELATION_ID_HEADER;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(DomainError::conflict("Email already registered"), 409)]
    #[case(DomainError::unprocessable("Unsupported currency"), 422)]
    #[case(DomainError::service_unavailable("Maintenance window"), 503)]
    #[actix_web::test]
    async fn writes_domain_status_message_and_id(
        #[case] domain: DomainError,
        #[case] status: u16,
    ) {
        let id = CorrelationId::parse("domain-1").expect("valid id");
        let domain = domain.with_correlation_id(id);
        let message = domain.message().to_owned();
        let app = test::init_service(App::new().wrap(DomainErrorPropagation).route(
            "/",
            web::get().to(move || {
                let domain = domain.clone();
                async move { Err::<HttpResponse, _>(domain) }
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status().as_u16(), status);
        assert!(res.response().error().is_none());
        assert_eq!(
            res.headers()
                .get(CORRELATION_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("domain-1")
        );
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["info"]["isSuccess"], false);
        assert_eq!(body["info"]["code"], status.to_string());
        assert_eq!(body["info"]["message"], message.as_str());
        assert_eq!(body["id"], "domain-1");
        assert_eq!(body["data"], Value::Null);
    }

    #[actix_web::test]
    async fn leaves_other_errors_for_the_barrier() {
        let app = test::init_service(App::new().wrap(DomainErrorPropagation).route(
            "/",
            web::get().to(|| async { Err::<HttpResponse, _>(Fault::timeout("db")) }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        let carried = res.response().error().expect("error still attached");
        assert!(carried.as_error::<Fault>().is_some());
    }

    #[actix_web::test]
    async fn passes_successes_through() {
        let app = test::init_service(
            App::new()
                .wrap(DomainErrorPropagation)
                .route("/", web::get().to(|| async { HttpResponse::Ok().body("fine") })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "fine");
    }
}
