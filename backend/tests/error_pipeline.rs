//! End-to-end behaviour of the error pipeline: domain errors propagate with
//! their own status and id, everything else is classified generically.

use actix_http::Request;
use actix_web::body::{MessageBody, to_bytes};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use backend::domain::{CorrelationId, DomainError, ErrorStatus, Fault};
use backend::inbound::http::ApiResult;
use backend::inbound::http::enveloped::Enveloped;
use backend::inbound::http::extractors;
use backend::inbound::http::fallback::route_not_found;
use backend::middleware::{CorrelationScope, DomainErrorPropagation, FaultBarrier};
use envelope::CORRELATION_ID_HEADER;
use rstest::rstest;
use serde_json::{Value, json};

struct Reply {
    status: StatusCode,
    header: Option<String>,
    body: Value,
}

async fn send<S, B>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody + 'static,
{
    let response = match test::try_call_service(app, req).await {
        Ok(res) => res.into_parts().1.map_into_boxed_body(),
        Err(err) => err.error_response(),
    };
    let status = response.status();
    let header = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let body = serde_json::from_slice(&bytes).expect("every reply is JSON");
    Reply {
        status,
        header,
        body,
    }
}

async fn failing_with_unexpected() -> ApiResult<HttpResponse> {
    Err(Fault::unexpected("NullReferenceException in OrderRepository line 42").into())
}

async fn failing_with_null_argument() -> ApiResult<HttpResponse> {
    Err(Fault::argument_null("customerId").into())
}

async fn failing_with_domain_404() -> ApiResult<HttpResponse> {
    let id = CorrelationId::parse("abc-123").expect("valid id");
    Err(DomainError::new(ErrorStatus::NOT_FOUND, "Order 42 does not exist")
        .with_correlation_id(id)
        .into())
}

async fn failing_with_scoped_domain_error() -> ApiResult<HttpResponse> {
    Err(DomainError::conflict("Email already registered").into())
}

#[derive(serde::Deserialize)]
struct Page {
    page: u32,
}

async fn order_by_number(number: web::Path<u64>, page: web::Query<Page>) -> Enveloped<Value> {
    Enveloped::ok(json!({"order": number.into_inner(), "page": page.page}))
}

async fn succeeding() -> Enveloped<Value> {
    Enveloped::ok(json!({"items": [1, 2, 3], "total": 3}))
}

macro_rules! pipeline_app {
    () => {
        test::init_service(
            App::new()
                .configure(extractors::configure)
                .route("/orders/{number}", web::get().to(order_by_number))
                .route("/unexpected", web::get().to(failing_with_unexpected))
                .route("/null-argument", web::get().to(failing_with_null_argument))
                .route("/domain-404", web::get().to(failing_with_domain_404))
                .route("/conflict", web::get().to(failing_with_scoped_domain_error))
                .route("/ok", web::get().to(succeeding))
                .default_service(web::to(route_not_found))
                .wrap(DomainErrorPropagation)
                .wrap(FaultBarrier)
                .wrap(CorrelationScope),
        )
        .await
    };
}

#[actix_web::test]
async fn unrecognised_faults_become_generic_500() {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri("/unexpected").to_request()).await;

    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply.body["info"],
        json!({
            "isSuccess": false,
            "code": "500",
            "message": "An internal server error occurred"
        })
    );
    assert!(!reply.body.to_string().contains("NullReference"));
}

#[actix_web::test]
async fn null_arguments_become_invalid_input() {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri("/null-argument").to_request()).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["info"]["code"], "400");
    assert_eq!(reply.body["info"]["message"], "Invalid input parameters");
    assert!(!reply.body.to_string().contains("customerId"));
}

#[actix_web::test]
async fn domain_errors_keep_their_status_and_id() {
    let app = pipeline_app!();
    let reply = send(
        &app,
        test::TestRequest::get()
            .uri("/domain-404")
            .insert_header((CORRELATION_ID_HEADER, "request-id"))
            .to_request(),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["id"], "abc-123");
    assert_eq!(reply.header.as_deref(), Some("abc-123"));
    assert_eq!(reply.body["info"]["message"], "Order 42 does not exist");
}

#[actix_web::test]
async fn domain_errors_capture_the_request_id() {
    let app = pipeline_app!();
    let reply = send(
        &app,
        test::TestRequest::get()
            .uri("/conflict")
            .insert_header((CORRELATION_ID_HEADER, "1718000000000-k3j9x0a1b"))
            .to_request(),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["info"]["code"], "409");
    assert_eq!(reply.body["id"], "1718000000000-k3j9x0a1b");
}

#[actix_web::test]
async fn unknown_routes_become_generic_404() {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["info"]["message"], "Resource not found");
    assert!(!reply.body.to_string().contains("nowhere"));
    assert_eq!(reply.body["id"].as_str(), reply.header.as_deref());
}

#[actix_web::test]
async fn successes_carry_data_and_the_request_id() {
    let app = pipeline_app!();
    let reply = send(
        &app,
        test::TestRequest::get()
            .uri("/ok")
            .insert_header((CORRELATION_ID_HEADER, "ok-7"))
            .to_request(),
    )
    .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["info"]["isSuccess"], true);
    assert_eq!(reply.body["data"], json!({"items": [1, 2, 3], "total": 3}));
    assert_eq!(reply.body["id"], "ok-7");
}

#[rstest]
#[case("/unexpected")]
#[case("/null-argument")]
#[case("/domain-404")]
#[case("/conflict")]
#[case("/nowhere")]
#[actix_web::test]
async fn failures_always_have_null_data_and_agreeing_status(#[case] path: &str) {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri(path).to_request()).await;

    assert_eq!(reply.body["data"], Value::Null);
    assert_eq!(reply.body["info"]["isSuccess"], false);
    assert_eq!(
        reply.body["info"]["code"],
        reply.status.as_u16().to_string()
    );
}

#[rstest]
#[case("/orders/not-a-number?page=1")]
#[case("/orders/42?page=first")]
#[case("/orders/42")]
#[actix_web::test]
async fn malformed_path_and_query_values_are_invalid_input(#[case] uri: &str) {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["info"]["message"], "Invalid input parameters");
    assert!(!reply.body.to_string().contains("not-a-number"));
}

#[actix_web::test]
async fn well_formed_path_and_query_values_reach_the_handler() {
    let app = pipeline_app!();
    let reply = send(&app, test::TestRequest::get().uri("/orders/42?page=2").to_request()).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"], json!({"order": 42, "page": 2}));
}
