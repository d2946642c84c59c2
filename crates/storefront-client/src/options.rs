//! Per-call overrides.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ClientConfig;

/// Options for a single call; unset fields fall back to [`ClientConfig`].
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use storefront_client::RequestOptions;
///
/// let options = RequestOptions::default()
///     .timeout(Duration::from_secs(2))
///     .retries(0)
///     .success_message("Order placed");
/// assert!(options.attaches_auth());
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    retries: Option<u32>,
    retry_delay: Option<Duration>,
    notify: Option<bool>,
    attach_auth: bool,
    success_message: Option<String>,
    headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            retries: None,
            retry_delay: None,
            notify: None,
            attach_auth: true,
            success_message: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    /// Per-attempt timeout for this call.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retry count for network failures on this call.
    #[must_use]
    pub const fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Initial backoff delay for this call.
    #[must_use]
    pub const fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Show or suppress notifications for this call.
    #[must_use]
    pub const fn notify(mut self, enabled: bool) -> Self {
        self.notify = Some(enabled);
        self
    }

    /// Skip the bearer token even when one is stored.
    #[must_use]
    pub const fn without_auth(mut self) -> Self {
        self.attach_auth = false;
        self
    }

    /// Message passed to the notifier when the call succeeds.
    #[must_use]
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    /// Add a header for this call only.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Whether the stored bearer token is attached.
    #[must_use]
    pub const fn attaches_auth(&self) -> bool {
        self.attach_auth
    }

    pub(crate) fn resolve(&self, config: &ClientConfig) -> CallPolicy {
        CallPolicy {
            timeout: self.timeout.unwrap_or_else(|| config.timeout()),
            retries: self.retries.unwrap_or_else(|| config.retries()),
            retry_delay: self.retry_delay.unwrap_or_else(|| config.retry_delay()),
            notify: self.notify.unwrap_or_else(|| config.notifications()),
        }
    }

    pub(crate) const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn success_text(&self) -> Option<&str> {
        self.success_message.as_deref()
    }
}

/// Effective limits for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CallPolicy {
    pub(crate) timeout: Duration,
    pub(crate) retries: u32,
    pub(crate) retry_delay: Duration,
    pub(crate) notify: bool,
}

impl CallPolicy {
    /// Delay before retry number `attempt` (zero based): `retry_delay * 2^attempt`.
    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_delay.saturating_mul(factor)
    }
}
