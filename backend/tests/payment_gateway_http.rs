//! Behavioural tests for the HTTP payment gateway adapter against a local
//! fake gateway.

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use backend::domain::payments::{Currency, PaymentOrderRequest};
use backend::domain::ports::{PaymentGateway, PaymentGatewayError};
use backend::outbound::payment_gateway::{GatewayCredentials, HttpPaymentGateway};
use reqwest::Url;
use rstest::rstest;
use serde_json::{Value, json};
use zeroize::Zeroizing;

#[derive(Clone, Copy)]
enum Behaviour {
    Accept,
    Reject,
    DenyCredentials,
    Garbage,
    Slow,
}

async fn orders(
    req: HttpRequest,
    body: web::Json<Value>,
    behaviour: web::Data<Behaviour>,
) -> HttpResponse {
    let authorised = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Basic "));
    if !authorised {
        return HttpResponse::Unauthorized().finish();
    }
    match **behaviour {
        Behaviour::Accept => HttpResponse::Ok().json(json!({
            "id": "order_fake_1",
            "entity": "order",
            "amount": body["amount"],
            "currency": body["currency"],
            "receipt": body["receipt"],
            "status": "created"
        })),
        Behaviour::Reject => HttpResponse::BadRequest().json(json!({
            "error": {"code": "BAD_REQUEST_ERROR", "description": "amount exceeds maximum"}
        })),
        Behaviour::DenyCredentials => HttpResponse::Unauthorized().json(json!({
            "error": {"description": "authentication failed"}
        })),
        Behaviour::Garbage => HttpResponse::Ok()
            .content_type("application/json")
            .body("<html>maintenance</html>"),
        Behaviour::Slow => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            HttpResponse::Ok().finish()
        }
    }
}

fn spawn_gateway(behaviour: Behaviour) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake gateway");
    let port = listener.local_addr().expect("local addr").port();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(behaviour))
            .route("/v1/orders", web::post().to(orders))
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .expect("listen")
    .run();
    actix_web::rt::spawn(server);
    Url::parse(&format!("http://127.0.0.1:{port}/v1/")).expect("fake gateway url")
}

fn gateway(base: Url, timeout: Duration) -> HttpPaymentGateway {
    let credentials = GatewayCredentials {
        key_id: "rzp_test_key".to_owned(),
        key_secret: Zeroizing::new("rzp_test_secret".to_owned()),
    };
    HttpPaymentGateway::new(base, credentials, timeout).expect("adapter builds")
}

fn request() -> PaymentOrderRequest {
    PaymentOrderRequest::new(49_900, Currency::Inr, "rcpt_42").expect("valid request")
}

#[actix_web::test]
async fn accepted_orders_decode_into_domain_orders() {
    let adapter = gateway(spawn_gateway(Behaviour::Accept), Duration::from_secs(5));

    let order = adapter.create_order(&request()).await.expect("order created");

    assert_eq!(order.id, "order_fake_1");
    assert_eq!(order.amount_minor, 49_900);
    assert_eq!(order.currency, Currency::Inr);
    assert_eq!(order.receipt, "rcpt_42");
    assert_eq!(order.status, "created");
}

#[rstest]
#[case(Behaviour::Reject, "rejected")]
#[case(Behaviour::DenyCredentials, "transport")]
#[case(Behaviour::Garbage, "decode")]
#[case(Behaviour::Slow, "timeout")]
#[actix_web::test]
async fn failures_map_onto_port_errors(#[case] behaviour: Behaviour, #[case] expected: &str) {
    let adapter = gateway(spawn_gateway(behaviour), Duration::from_millis(200));

    let error = adapter
        .create_order(&request())
        .await
        .expect_err("gateway call fails");

    let actual = match error {
        PaymentGatewayError::Rejected { .. } => "rejected",
        PaymentGatewayError::Transport { .. } => "transport",
        PaymentGatewayError::Decode { .. } => "decode",
        PaymentGatewayError::Timeout { .. } => "timeout",
        PaymentGatewayError::Unconfigured => "unconfigured",
    };
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn rejection_detail_is_kept_for_logs() {
    let adapter = gateway(spawn_gateway(Behaviour::Reject), Duration::from_secs(5));

    let error = adapter
        .create_order(&request())
        .await
        .expect_err("gateway rejects");

    assert_eq!(
        error,
        PaymentGatewayError::rejected("status 400: BAD_REQUEST_ERROR: amount exceeds maximum")
    );
}

#[actix_web::test]
async fn unreachable_gateway_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    let base = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
    let adapter = gateway(base, Duration::from_secs(2));

    let error = adapter
        .create_order(&request())
        .await
        .expect_err("nothing listens");

    assert!(matches!(error, PaymentGatewayError::Transport { .. }));
}
