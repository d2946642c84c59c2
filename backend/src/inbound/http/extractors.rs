//! Extractor error handlers.
//!
//! Malformed JSON bodies, query strings and path segments are raised as
//! [`Fault::InvalidArgument`] so the generic classifier answers them with a
//! 400 whatever status actix would pick by default.

use actix_web::web;

use crate::domain::Fault;

/// Register the JSON, query and path extractor configs on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| Fault::invalid_argument(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| Fault::invalid_argument(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| Fault::invalid_argument(err.to_string()).into()),
    );
}
