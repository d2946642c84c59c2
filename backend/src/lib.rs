//! Storefront backend library modules.
//!
//! The binary in `main.rs` only loads settings and starts the server; every
//! piece it wires together lives here so integration tests can build the same
//! application in-process.

pub mod app;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
