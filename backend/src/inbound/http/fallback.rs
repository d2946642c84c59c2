//! Default service for requests that match no route.

use actix_web::{HttpRequest, HttpResponse};

use super::ApiResult;
use crate::domain::Fault;

/// Raise [`Fault::NotFound`] so unknown routes get the generic 404 envelope.
pub async fn route_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Fault::not_found(format!("no route for {} {}", req.method(), req.path())).into())
}
