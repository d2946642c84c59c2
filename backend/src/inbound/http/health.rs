//! Health endpoints: liveness and readiness probes for orchestration and load
//! balancers. Healthy probes answer with a success envelope; failing probes
//! raise a 503 domain error so the body keeps the envelope shape.
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use super::ApiResult;
use super::enveloped::Enveloped;
use super::schemas::{ErrorEnvelopeSchema, ProbeEnvelopeSchema};
use crate::domain::DomainError;

/// Shared health state for readiness and liveness checks.
/// Track readiness and whether the process should report itself as alive to orchestrators.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Flag the service as unhealthy so liveness checks fail fast during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Probe payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeStatus {
    /// Always `"ok"` when the probe passes.
    #[schema(example = "ok")]
    pub status: &'static str,
}

fn probe(ok: bool, failure: &str) -> ApiResult<Enveloped<ProbeStatus>> {
    if ok {
        Ok(Enveloped::ok(ProbeStatus { status: "ok" }).no_store())
    } else {
        Err(DomainError::service_unavailable(failure).into())
    }
}

/// Readiness probe. Return 200 when dependencies are initialised and the server can handle traffic; return 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ProbeEnvelopeSchema),
        (status = 503, description = "Server is not ready", body = ErrorEnvelopeSchema)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> ApiResult<Enveloped<ProbeStatus>> {
    probe(state.is_ready(), "Service is not ready")
}

/// Liveness probe. Return 200 while the process is marked alive and 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive", body = ProbeEnvelopeSchema),
        (status = 503, description = "Server is shutting down", body = ErrorEnvelopeSchema)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> ApiResult<Enveloped<ProbeStatus>> {
    probe(state.is_alive(), "Service is shutting down")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::DomainErrorPropagation;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(true, "/health/ready", StatusCode::OK)]
    #[case(false, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(true, "/health/live", StatusCode::OK)]
    #[actix_web::test]
    async fn probes_report_state(
        #[case] mark_ready: bool,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if mark_ready {
            state.mark_ready();
        }
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(DomainErrorPropagation)
                .service(ready)
                .service(live),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(res.status(), expected);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["info"]["isSuccess"], expected.is_success());
    }

    #[actix_web::test]
    async fn draining_fails_liveness() {
        let state = web::Data::new(HealthState::new());
        state.mark_unhealthy();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(DomainErrorPropagation)
                .service(live),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
            .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["info"]["message"], "Service is shutting down");
    }
}
