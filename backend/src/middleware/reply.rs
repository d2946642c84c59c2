//! Rendered failure envelope shared by the error middlewares.
//!
//! [`ErrorReply`] is the last stop for every failure: a status, a message that
//! is safe for clients and the correlation id the client can quote back. It is
//! itself an actix [`ResponseError`] so it can travel through `Err` paths where
//! no request is available to build a `ServiceResponse`.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use envelope::{CORRELATION_ID_HEADER, Envelope};
use tracing::error;

use crate::domain::{CorrelationId, DomainError};

/// Body written when the envelope itself cannot be serialised.
const FALLBACK_BODY: &str = concat!(
    r#"{"info":{"isSuccess":false,"code":"500","#,
    r#""message":"An internal server error occurred"},"data":null,"id":null}"#
);

/// Failure ready to be written as an error envelope.
///
/// # Examples
/// ```
/// use actix_web::ResponseError;
/// use actix_web::http::StatusCode;
/// use backend::domain::CorrelationId;
/// use backend::middleware::ErrorReply;
///
/// let id = CorrelationId::parse("abc-123").expect("valid id");
/// let reply = ErrorReply::new(StatusCode::NOT_FOUND, "Resource not found", id);
/// assert_eq!(reply.error_response().status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    status: StatusCode,
    message: String,
    correlation_id: CorrelationId,
}

impl ErrorReply {
    /// Build a reply from its parts.
    pub fn new(
        status: StatusCode,
        message: impl Into<String>,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            correlation_id,
        }
    }

    /// Reply carrying a domain error's own status, message and id.
    pub fn from_domain(error: &DomainError) -> Self {
        let status = StatusCode::from_u16(error.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, error.message(), error.correlation_id().clone())
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier written to the body and the response header.
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }
}

impl std::fmt::Display for ErrorReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl ResponseError for ErrorReply {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let envelope = Envelope::<()>::failure(
            self.status.as_u16(),
            self.message.as_str(),
            Some(self.correlation_id.to_string()),
        );
        let mut builder = HttpResponse::build(self.status);
        builder
            .content_type(ContentType::json())
            .insert_header((CORRELATION_ID_HEADER, self.correlation_id.as_str()));
        match serde_json::to_vec(&envelope) {
            Ok(body) => builder.body(body),
            Err(err) => {
                error!(
                    error = %err,
                    correlation_id = %self.correlation_id,
                    "failed to serialise error envelope"
                );
                HttpResponse::InternalServerError()
                    .content_type(ContentType::json())
                    .body(FALLBACK_BODY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn renders_failure_envelope() {
        let id = CorrelationId::parse("abc-123").expect("valid id");
        let response =
            ErrorReply::new(StatusCode::REQUEST_TIMEOUT, "Request timeout", id).error_response();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let header = response
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        assert_eq!(header, Some("abc-123"));

        let bytes = to_bytes(response.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["info"]["isSuccess"], false);
        assert_eq!(body["info"]["code"], "408");
        assert_eq!(body["info"]["message"], "Request timeout");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["id"], "abc-123");
    }

    #[test]
    fn fallback_body_is_an_envelope() {
        let body: Value = serde_json::from_str(FALLBACK_BODY).expect("valid json");
        let info = envelope::probe_info(&body).expect("envelope shape");
        assert_eq!(info.status(), Some(500));
        assert!(!info.is_success());
    }

    #[test]
    fn domain_reply_keeps_status_message_and_id() {
        let id = CorrelationId::parse("dom-1").expect("valid id");
        let error = DomainError::conflict("Email already registered").with_correlation_id(id);
        let reply = ErrorReply::from_domain(&error);
        assert_eq!(reply.status(), StatusCode::CONFLICT);
        assert_eq!(reply.message(), "Email already registered");
        assert_eq!(reply.correlation_id().as_str(), "dom-1");
    }
}
