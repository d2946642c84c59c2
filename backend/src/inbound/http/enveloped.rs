//! Success responder wrapping handler payloads in the response envelope.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpRequest, HttpResponse, Responder};
use envelope::{CORRELATION_ID_HEADER, Envelope, SUCCESS_MESSAGE};
use serde::Serialize;

use crate::domain::{CorrelationId, Fault};

/// Handler payload rendered as a success envelope.
///
/// The envelope id is the request's correlation id. Serialisation failures
/// surface as an unexpected fault for the error middlewares to render.
///
/// # Examples
/// ```
/// use backend::inbound::http::enveloped::Enveloped;
///
/// async fn handler() -> Enveloped<&'static str> {
///     Enveloped::ok("pong")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Enveloped<T> {
    status: StatusCode,
    message: String,
    data: T,
    no_store: bool,
}

impl<T> Enveloped<T> {
    /// 200 OK with the standard success message.
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: SUCCESS_MESSAGE.to_owned(),
            data,
            no_store: false,
        }
    }

    /// 201 Created.
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: "Created".to_owned(),
            data,
            no_store: false,
        }
    }

    /// Replace the envelope message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Mark the response as uncacheable.
    #[must_use]
    pub fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }
}

impl<T: Serialize> Responder for Enveloped<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let id = CorrelationId::current_or_generate();
        let envelope = Envelope::success_with_status(self.status.as_u16(), self.message, self.data)
            .with_id(id.to_string());
        match serde_json::to_vec(&envelope) {
            Ok(body) => {
                let mut builder = HttpResponse::build(self.status);
                builder
                    .content_type(ContentType::json())
                    .insert_header((CORRELATION_ID_HEADER, id.as_str()));
                if self.no_store {
                    builder.insert_header((CACHE_CONTROL, "no-store"));
                }
                builder.body(body)
            }
            Err(err) => HttpResponse::from_error(Fault::unexpected(err)),
        }
    }
}
