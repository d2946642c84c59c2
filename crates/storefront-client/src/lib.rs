//! Typed HTTP client for the storefront API.
//!
//! [`ApiClient`] is the one place outbound calls are made from. It unwraps the
//! response envelope on success and turns every failure into a
//! [`ClientError`] whose [`code`](ClientError::code) the UI can switch on.
//! Network failures are retried with exponential backoff; nothing else is.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use serde_json::Value;
//! use storefront_client::{ApiClient, ClientConfig, RequestOptions, TracingNotifier};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:8080")?)?
//!     .with_notifier(Arc::new(TracingNotifier));
//! match client
//!     .get::<Value>("health/ready", RequestOptions::default().timeout(Duration::from_secs(2)))
//!     .await
//! {
//!     Ok(status) => println!("ready: {status}"),
//!     Err(err) => println!("{} ({:?})", err.code(), err.correlation_id()),
//! }
//! # Ok(())
//! # }
//! ```

mod classify;
mod client;
mod config;
mod correlation;
mod credentials;
mod error;
mod notify;
mod options;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
pub use correlation::generate_correlation_id;
pub use credentials::{CredentialStore, InMemoryCredentials, NoCredentials};
pub use error::{ClientBuildError, ClientError, ErrorDetails, TRANSPORT_STATUS};
pub use notify::{Notifier, SilentNotifier, TracingNotifier};
pub use options::RequestOptions;
