//! The single chokepoint for outbound storefront API calls.
//!
//! Every call goes through [`ApiClient::request`], which attaches credentials
//! and a correlation id, bounds each attempt with a timeout, retries network
//! failures with exponential backoff and normalises the outcome into either
//! the payload or a [`ClientError`].

use std::sync::Arc;
use std::time::Duration;

use envelope::CORRELATION_ID_HEADER;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::classify::RawResponse;
use crate::config::ClientConfig;
use crate::correlation::generate_correlation_id;
use crate::credentials::{CredentialStore, NoCredentials};
use crate::error::{ClientBuildError, ClientError, ErrorDetails, TRANSPORT_STATUS};
use crate::notify::{Notifier, SilentNotifier};
use crate::options::{CallPolicy, RequestOptions};

/// Storefront API client.
///
/// Cheap to clone; clones share the connection pool and collaborators.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use serde_json::Value;
/// use storefront_client::{ApiClient, ClientConfig, InMemoryCredentials, RequestOptions};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("http://localhost:8080/api/v1")?;
/// let client = ApiClient::new(config)?
///     .with_credentials(Arc::new(InMemoryCredentials::with_token("token-1")));
/// let order: Value = client
///     .post("payments/orders", &serde_json::json!({"amount": 49900}), RequestOptions::default())
///     .await?;
/// # let _ = order;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client without credentials or notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::Http`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        let http = Client::builder()
            .default_headers(config.default_headers().clone())
            .build()?;
        Ok(Self {
            http,
            config,
            credentials: Arc::new(NoCredentials),
            notifier: Arc::new(SilentNotifier),
        })
    }

    /// Use `credentials` for bearer tokens.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Report outcomes to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Shared configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET` `path` and decode the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request::<(), T>(Method::GET, path, None, &options).await
    }

    /// `POST` `body` to `path` and decode the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request(Method::POST, path, Some(body), &options).await
    }

    /// `PUT` `body` to `path` and decode the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request(Method::PUT, path, Some(body), &options).await
    }

    /// `PATCH` `body` to `path` and decode the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request(Method::PATCH, path, Some(body), &options).await
    }

    /// `DELETE` `path` and decode the payload.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.request::<(), T>(Method::DELETE, path, None, &options).await
    }

    /// Issue a call, retrying network failures, and decode the payload.
    ///
    /// Retried calls are re-sent as-is; a non-idempotent call whose response
    /// was lost may therefore run twice on the server.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ClientError`] of the final attempt.
    pub async fn request<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<T, ClientError> {
        let policy = options.resolve(&self.config);
        let result = match encode_body(body) {
            Ok(payload) => {
                retry_network_failures(&policy, &method, path, || {
                    self.attempt(method.clone(), path, payload.as_deref(), options, policy.timeout)
                })
                .await
            }
            Err(err) => Err(err),
        };
        self.report(&policy, options, &result);
        result
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
        options: &RequestOptions,
        timeout: Duration,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        let correlation_id = generate_correlation_id();
        let mut request = self
            .http
            .request(method, url)
            .headers(options.headers().clone())
            .header(CORRELATION_ID_HEADER, correlation_id.as_str());
        if options.attaches_auth()
            && let Some(token) = self.credentials.bearer_token()
        {
            request = request.bearer_auth(token);
        }
        if let Some(bytes) = payload {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.to_vec());
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let header_id = response
                .headers()
                .get(CORRELATION_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                header_id,
                body: bytes.to_vec(),
            })
        };

        let raw = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => return Err(transport_failure(&err, correlation_id)),
            Err(_) => {
                return Err(ClientError::Network(ErrorDetails::new(
                    format!("Request timed out after {} ms", timeout.as_millis()),
                    TRANSPORT_STATUS,
                    Some(correlation_id),
                )));
            }
        };
        raw.into_result()
    }

    /// Resolve `path` against the base URL.
    ///
    /// The result must stay on the base URL's origin so credentials never
    /// leave it; absolute URLs to other hosts are rejected.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let invalid = |reason: String| {
            ClientError::Unknown(ErrorDetails::new(
                format!("Invalid endpoint path '{path}': {reason}"),
                TRANSPORT_STATUS,
                None,
            ))
        };
        let base = self.config.base_url();
        let url = base
            .join(path.trim_start_matches('/'))
            .map_err(|err| invalid(err.to_string()))?;
        if url.origin() != base.origin() {
            return Err(invalid("outside the configured base URL".to_owned()));
        }
        Ok(url)
    }

    fn report<T>(&self, policy: &CallPolicy, options: &RequestOptions, result: &Result<T, ClientError>) {
        if !policy.notify {
            return;
        }
        match result {
            Ok(_) => {
                if let Some(message) = options.success_text() {
                    self.notifier.success(message);
                }
            }
            Err(err @ ClientError::RateLimit(_)) => self.notifier.warning(err),
            Err(err) => self.notifier.error(err),
        }
    }
}

fn encode_body<B: Serialize>(body: Option<&B>) -> Result<Option<Vec<u8>>, ClientError> {
    body.map(serde_json::to_vec)
        .transpose()
        .map_err(|err| {
            ClientError::Unknown(ErrorDetails::new(
                format!("Request body could not be encoded: {err}"),
                TRANSPORT_STATUS,
                None,
            ))
        })
}

fn transport_failure(err: &reqwest::Error, correlation_id: String) -> ClientError {
    let message = if err.is_timeout() {
        "Request timed out".to_owned()
    } else if err.is_connect() {
        "Unable to reach the server".to_owned()
    } else if err.is_decode() || err.is_body() {
        "Connection interrupted while reading the response".to_owned()
    } else {
        "Network request failed".to_owned()
    };
    debug!(error = %err, %correlation_id, "api transport failure");
    ClientError::Network(ErrorDetails::new(
        message,
        TRANSPORT_STATUS,
        Some(correlation_id),
    ))
}

async fn retry_network_failures<T, F, Fut>(
    policy: &CallPolicy,
    method: &Method,
    path: &str,
    mut call: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0_u32;
    loop {
        match call().await {
            Err(err) if err.is_retryable() && attempt < policy.retries => {
                let delay = policy.backoff(attempt);
                debug!(
                    %method,
                    path,
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    detail = err.message(),
                    "retrying api call"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}
