//! Application assembly: routes, shared state and the middleware stack.
//!
//! Middleware is registered innermost first. [`DomainErrorPropagation`] sees
//! handler results before [`FaultBarrier`], which sees everything left over;
//! [`CorrelationScope`] wraps both so every log line and reply shares one id.
//! CORS sits outermost so preflight requests never reach the handlers.

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::extractors;
use crate::inbound::http::fallback::route_not_found;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::payments::{create_order, verify_payment};
use crate::inbound::http::state::HttpState;
use crate::middleware::{CorrelationScope, DomainErrorPropagation, FaultBarrier};

/// Everything the application factory needs, cloned once per worker.
#[derive(Clone)]
pub struct AppDependencies {
    /// Shared readiness and liveness flags.
    pub health_state: web::Data<HealthState>,
    /// Use-cases behind the HTTP handlers.
    pub http_state: web::Data<HttpState>,
    /// Origins allowed to call the API from a browser.
    pub cors_allowed_origins: Vec<String>,
}

fn cors(origins: &[String]) -> Cors {
    let correlation = HeaderName::from_static("x-correlation-id");
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allowed_header(correlation.clone())
        .expose_headers(vec![correlation])
        .max_age(3600);
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Build the application with its full middleware stack.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::web;
/// use backend::app::{AppDependencies, build_app};
/// use backend::domain::payments::PaymentService;
/// use backend::domain::ports::FixturePaymentGateway;
/// use backend::inbound::http::health::HealthState;
/// use backend::inbound::http::state::HttpState;
///
/// let payments = PaymentService::new(Arc::new(FixturePaymentGateway), None);
/// let _app = build_app(AppDependencies {
///     health_state: web::Data::new(HealthState::new()),
///     http_state: web::Data::new(HttpState::new(payments)),
///     cors_allowed_origins: vec!["https://shop.example.com".to_owned()],
/// });
/// ```
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_allowed_origins,
    } = deps;

    let api = web::scope("/api/v1")
        .service(create_order)
        .service(verify_payment);

    let app = App::new()
        .configure(extractors::configure)
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(route_not_found))
        .wrap(DomainErrorPropagation)
        .wrap(FaultBarrier)
        .wrap(CorrelationScope)
        .wrap(cors(&cors_allowed_origins))
}
