//! Tests for generic fault classification and rendering.

use super::*;
use actix_http::Request;
use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test as actix_test, web};
use envelope::CORRELATION_ID_HEADER;
use rstest::rstest;
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::CorrelationScope;

const SECRET: &str = "connection string postgres://admin:hunter2@db";

#[derive(Debug, Deserialize)]
struct Payload {
    #[expect(dead_code, reason = "only exercised through deserialisation")]
    amount: u64,
}

async fn init() -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    actix_test::init_service(
        App::new()
            .wrap(FaultBarrier)
            .wrap(CorrelationScope)
            .route(
                "/fault/{kind}",
                web::get().to(|kind: web::Path<String>| async move {
                    let fault = match kind.as_str() {
                        "invalid" => Fault::invalid_argument(SECRET),
                        "null" => Fault::argument_null(SECRET),
                        "unauthorized" => Fault::unauthorized(SECRET),
                        "missing" => Fault::not_found(SECRET),
                        "operation" => Fault::invalid_operation(SECRET),
                        "timeout" => Fault::timeout(SECRET),
                        "unimplemented" => Fault::not_implemented(SECRET),
                        _ => Fault::unexpected(SECRET),
                    };
                    Err::<HttpResponse, _>(fault)
                }),
            )
            .route(
                "/json",
                web::post().to(|_body: web::Json<Payload>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/query",
                web::get().to(|_q: web::Query<Payload>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/path/{amount}",
                web::get().to(|_p: web::Path<u64>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/io-timeout",
                web::get().to(|| async {
                    Err::<HttpResponse, _>(std::io::Error::new(std::io::ErrorKind::TimedOut, SECRET))
                }),
            )
            .route(
                "/declared/{status}",
                web::get().to(|status: web::Path<u16>| async move {
                    let err = match status.into_inner() {
                        401 => actix_web::error::ErrorUnauthorized(SECRET),
                        403 => actix_web::error::ErrorForbidden(SECRET),
                        404 => actix_web::error::ErrorNotFound(SECRET),
                        408 => actix_web::error::ErrorRequestTimeout(SECRET),
                        501 => actix_web::error::ErrorNotImplemented(SECRET),
                        _ => actix_web::error::ErrorConflict(SECRET),
                    };
                    Err::<HttpResponse, _>(err)
                }),
            )
            .route(
                "/panic",
                web::get().to(|| async {
                    if SECRET.is_empty() {
                        return HttpResponse::Ok().finish();
                    }
                    panic!("{SECRET}");
                }),
            )
            .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") })),
    )
    .await
}

struct Rendered {
    status: StatusCode,
    header: Option<String>,
    body: Value,
    raw: String,
}

async fn respond(req: Request) -> Rendered {
    let app = init().await;
    let response = match actix_test::try_call_service(&app, req).await {
        Ok(res) => res.into_parts().1,
        Err(err) => err.error_response(),
    };
    let status = response.status();
    let header = response
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let raw = String::from_utf8(bytes.to_vec()).expect("utf8 body");
    let body = serde_json::from_str(&raw).unwrap_or(Value::Null);
    Rendered {
        status,
        header,
        body,
        raw,
    }
}

fn assert_generic(rendered: &Rendered, status: u16, message: &str) {
    assert_eq!(rendered.status.as_u16(), status);
    assert_eq!(rendered.body["info"]["isSuccess"], false);
    assert_eq!(rendered.body["info"]["code"], status.to_string());
    assert_eq!(rendered.body["info"]["message"], message);
    assert_eq!(rendered.body["data"], Value::Null);
    assert!(
        !rendered.raw.contains("hunter2"),
        "raw error text leaked: {}",
        rendered.raw
    );
}

#[rstest]
#[case("invalid", 400, "Invalid input parameters")]
#[case("null", 400, "Invalid input parameters")]
#[case("unauthorized", 401, "Unauthorized access")]
#[case("missing", 404, "Resource not found")]
#[case("operation", 400, "Invalid operation")]
#[case("timeout", 408, "Request timeout")]
#[case("unimplemented", 501, "Feature not implemented")]
#[case("other", 500, "An internal server error occurred")]
#[actix_web::test]
async fn faults_follow_the_fixed_table(
    #[case] kind: &str,
    #[case] status: u16,
    #[case] message: &str,
) {
    let rendered = respond(
        actix_test::TestRequest::get()
            .uri(&format!("/fault/{kind}"))
            .to_request(),
    )
    .await;
    assert_generic(&rendered, status, message);
}

#[actix_web::test]
async fn envelope_id_is_the_request_correlation_id() {
    let rendered = respond(
        actix_test::TestRequest::get()
            .uri("/fault/timeout")
            .insert_header((CORRELATION_ID_HEADER, "client-abc"))
            .to_request(),
    )
    .await;
    assert_eq!(rendered.body["id"], "client-abc");
    assert_eq!(rendered.header.as_deref(), Some("client-abc"));
}

#[actix_web::test]
async fn generated_id_matches_header() {
    let rendered = respond(actix_test::TestRequest::get().uri("/fault/other").to_request()).await;
    let header = rendered.header.clone().expect("correlation header");
    assert_eq!(rendered.body["id"], header.as_str());
}

#[rstest]
#[case(actix_test::TestRequest::post()
    .uri("/json")
    .insert_header(("content-type", "application/json"))
    .set_payload("{\"amount\": \"lots\"}"))]
#[case(actix_test::TestRequest::get().uri("/query?amount=-1"))]
#[case(actix_test::TestRequest::get().uri("/path/not-a-number"))]
#[actix_web::test]
async fn extractor_failures_are_invalid_input(#[case] req: actix_test::TestRequest) {
    let rendered = respond(req.to_request()).await;
    assert_generic(&rendered, 400, "Invalid input parameters");
}

#[actix_web::test]
async fn io_timeouts_are_request_timeouts() {
    let rendered = respond(actix_test::TestRequest::get().uri("/io-timeout").to_request()).await;
    assert_generic(&rendered, 408, "Request timeout");
}

#[rstest]
#[case(401, 401, "Unauthorized access")]
#[case(403, 500, "An internal server error occurred")]
#[case(404, 404, "Resource not found")]
#[case(408, 408, "Request timeout")]
#[case(409, 500, "An internal server error occurred")]
#[case(501, 501, "Feature not implemented")]
#[actix_web::test]
async fn declared_statuses_map_to_kinds(
    #[case] declared: u16,
    #[case] status: u16,
    #[case] message: &str,
) {
    let rendered = respond(
        actix_test::TestRequest::get()
            .uri(&format!("/declared/{declared}"))
            .to_request(),
    )
    .await;
    assert_generic(&rendered, status, message);
}

#[actix_web::test]
async fn panics_become_internal_errors() {
    let rendered = respond(
        actix_test::TestRequest::get()
            .uri("/panic")
            .insert_header((CORRELATION_ID_HEADER, "panic-1"))
            .to_request(),
    )
    .await;
    assert_generic(&rendered, 500, "An internal server error occurred");
    assert_eq!(rendered.body["id"], "panic-1");
}

#[actix_web::test]
async fn successes_pass_through() {
    let rendered = respond(actix_test::TestRequest::get().uri("/ok").to_request()).await;
    assert_eq!(rendered.status, StatusCode::OK);
    assert_eq!(rendered.raw, "fine");
}

#[rstest]
#[case(Fault::timeout("x").into(), FaultKind::Timeout)]
#[case(actix_web::error::ErrorBadRequest("x"), FaultKind::InvalidArgument)]
#[case(actix_web::error::ErrorBadGateway("x"), FaultKind::Unexpected)]
fn classification_is_stable(#[case] error: Error, #[case] expected: FaultKind) {
    assert_eq!(classify(&error), expected);
    assert_eq!(classify(&error), classify(&error));
}

#[test]
fn rendered_replies_are_not_reclassified() {
    let id = CorrelationId::parse("kept-1").expect("valid id");
    let reply = ErrorReply::new(StatusCode::CONFLICT, "Email already registered", id);
    let error: Error = reply.into();
    let line = RequestLine {
        method: "GET".to_owned(),
        path: "/".to_owned(),
    };
    assert!(line.reply_for(&error).is_none());
}
