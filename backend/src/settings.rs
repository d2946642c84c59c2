//! Server settings loaded via OrthoConfig.
//!
//! Values layer from CLI flags, `STOREFRONT_*` environment variables and
//! configuration files. Accessors apply defaults and validate the raw
//! strings so startup fails early with a precise message.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

use crate::outbound::payment_gateway::GatewayCredentials;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

/// Errors raised while validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A CORS origin is not an absolute http(s) origin.
    #[error("invalid CORS origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },
    /// The payment gateway URL is not an absolute URL.
    #[error("invalid payment gateway URL '{value}'")]
    InvalidGatewayUrl { value: String },
    /// A gateway URL was given without both halves of the key pair.
    #[error("payment gateway URL requires both a key id and a key secret")]
    IncompleteGatewayCredentials,
    /// The gateway timeout is zero.
    #[error("payment gateway timeout must be at least one second")]
    ZeroGatewayTimeout,
}

/// How orders reach the payment gateway.
#[derive(Debug)]
pub enum GatewayMode {
    /// Deterministic in-process gateway for local use and tests.
    Fixture,
    /// Real gateway over HTTP.
    Http {
        /// Base URL of the gateway API.
        url: Url,
        /// API key pair.
        credentials: GatewayCredentials,
    },
    /// No gateway; order creation reports the feature as unavailable.
    Unconfigured,
}

/// Configuration values for the storefront API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Origins allowed to call the API from a browser.
    ///
    /// Accepts a list or a single comma-separated string, so
    /// `STOREFRONT_CORS_ALLOWED_ORIGINS=https://a.test,https://b.test` works.
    #[serde(default, deserialize_with = "origin_list")]
    pub cors_allowed_origins: Option<Vec<String>>,
    /// Base URL of the payment gateway API.
    pub payment_gateway_url: Option<String>,
    /// Payment gateway key id.
    pub payment_key_id: Option<String>,
    /// Payment gateway key secret, also used to verify payment signatures.
    pub payment_key_secret: Option<String>,
    /// Payment gateway request timeout in seconds.
    pub payment_timeout_secs: Option<u64>,
    /// Use the in-process fixture gateway instead of a real one.
    #[ortho_config(default = false)]
    pub use_fixture_gateway: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn origin_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        OneOrMany::One(joined) => joined.split(',').map(str::to_owned).collect(),
        OneOrMany::Many(origins) => origins,
    }))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl ServerSettings {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = non_blank(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Return the validated CORS allow-list; empty when unset.
    pub fn cors_allowed_origins(&self) -> Result<Vec<String>, SettingsError> {
        self.cors_allowed_origins
            .iter()
            .flatten()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(validate_origin)
            .collect()
    }

    /// Return the gateway request timeout, falling back to ten seconds.
    pub fn payment_timeout(&self) -> Result<Duration, SettingsError> {
        match self.payment_timeout_secs.unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroGatewayTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the secret used to verify payment signatures, if configured.
    pub fn signature_secret(&self) -> Option<Zeroizing<String>> {
        non_blank(self.payment_key_secret.as_deref()).map(|secret| Zeroizing::new(secret.to_owned()))
    }

    /// Decide how orders reach the gateway.
    ///
    /// The fixture toggle wins; otherwise a URL selects the HTTP gateway and
    /// requires both key halves; with neither, the gateway is unconfigured.
    pub fn gateway_mode(&self) -> Result<GatewayMode, SettingsError> {
        if self.use_fixture_gateway {
            return Ok(GatewayMode::Fixture);
        }
        let Some(raw_url) = non_blank(self.payment_gateway_url.as_deref()) else {
            return Ok(GatewayMode::Unconfigured);
        };
        let url = Url::parse(raw_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| SettingsError::InvalidGatewayUrl {
                value: raw_url.to_owned(),
            })?;
        let (Some(key_id), Some(key_secret)) = (
            non_blank(self.payment_key_id.as_deref()),
            self.signature_secret(),
        ) else {
            return Err(SettingsError::IncompleteGatewayCredentials);
        };
        Ok(GatewayMode::Http {
            url,
            credentials: GatewayCredentials {
                key_id: key_id.to_owned(),
                key_secret,
            },
        })
    }
}

fn validate_origin(origin: &str) -> Result<String, SettingsError> {
    let invalid = |reason: &str| SettingsError::InvalidOrigin {
        origin: origin.to_owned(),
        reason: reason.to_owned(),
    };
    if origin == "*" {
        return Err(invalid("wildcards are not allowed"));
    }
    let url = Url::parse(origin).map_err(|_| invalid("not an absolute URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("origins carry no path, query or fragment"));
    }
    Ok(origin.trim_end_matches('/').to_owned())
}
