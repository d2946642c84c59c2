//! Client-wide defaults.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ClientBuildError;

/// Per-attempt timeout applied when a call does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Retries applied to network failures when a call does not override it.
pub const DEFAULT_RETRIES: u32 = 3;
/// First backoff delay; doubles on every retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration shared by every call made through one client.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use storefront_client::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:8080/api/v1")
///     .expect("valid url")
///     .with_timeout(Duration::from_secs(5))
///     .with_retries(1);
/// assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/v1/");
/// assert_eq!(config.retries(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    default_headers: HeaderMap,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    notifications: bool,
}

impl ClientConfig {
    /// Build a configuration with defaults for everything but the base URL.
    ///
    /// A trailing slash is added so relative endpoint paths resolve beneath
    /// the base path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidBaseUrl`] when `base_url` does not
    /// parse or cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ClientBuildError> {
        let mut parsed = Url::parse(base_url)
            .map_err(|err| ClientBuildError::InvalidBaseUrl(format!("{base_url}: {err}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl(base_url.to_owned()));
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self {
            base_url: parsed,
            default_headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            notifications: true,
        })
    }

    /// Add a header sent with every call.
    #[must_use]
    pub fn with_default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Override the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry count for network failures.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Override the initial backoff delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Enable or disable notifications by default.
    #[must_use]
    pub const fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    /// Base URL endpoint paths are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every call.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    /// Default per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Default retry count.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Default initial backoff delay.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Whether notifications are shown unless a call opts out.
    #[must_use]
    pub const fn notifications(&self) -> bool {
        self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::new("https://shop.example.com/api").expect("valid url");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retries(), 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert!(config.notifications());
        assert!(config.default_headers().is_empty());
    }

    #[rstest]
    #[case("https://shop.example.com", "https://shop.example.com/")]
    #[case("https://shop.example.com/api/v1", "https://shop.example.com/api/v1/")]
    #[case("https://shop.example.com/api/v1/", "https://shop.example.com/api/v1/")]
    fn base_url_gains_trailing_slash(#[case] raw: &str, #[case] expected: &str) {
        let config = ClientConfig::new(raw).expect("valid url");
        assert_eq!(config.base_url().as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:shop@example.com")]
    fn rejects_unusable_base_urls(#[case] raw: &str) {
        assert!(matches!(
            ClientConfig::new(raw),
            Err(ClientBuildError::InvalidBaseUrl(_))
        ));
    }
}
