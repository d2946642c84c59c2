//! HTTP inbound adapter exposing REST endpoints.

pub mod enveloped;
pub mod error;
pub mod extractors;
pub mod fallback;
pub mod health;
pub mod payments;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
