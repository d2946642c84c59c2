//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::payments::{PaymentService, SignatureVerifier};
use backend::domain::ports::{FixturePaymentGateway, PaymentGateway, UnconfiguredPaymentGateway};
use backend::outbound::payment_gateway::{HttpPaymentGateway, HttpPaymentGatewayBuildError};
use backend::settings::{GatewayMode, ServerSettings, SettingsError};
use tracing::{info, warn};

/// Errors raised while turning settings into a runnable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    /// A setting failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The HTTP payment gateway could not be built.
    #[error(transparent)]
    Gateway(#[from] HttpPaymentGatewayBuildError),
}

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_allowed_origins: Vec<String>,
    pub(crate) payments: PaymentService,
}

impl ServerConfig {
    /// Validate settings and build the adapters they select.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, ServerConfigError> {
        let gateway: Arc<dyn PaymentGateway> = match settings.gateway_mode()? {
            GatewayMode::Fixture => {
                warn!("using fixture payment gateway; orders are not sent anywhere");
                Arc::new(FixturePaymentGateway)
            }
            GatewayMode::Http { url, credentials } => {
                info!(gateway = %url, key_id = %credentials.key_id, "using HTTP payment gateway");
                Arc::new(HttpPaymentGateway::new(
                    url,
                    credentials,
                    settings.payment_timeout()?,
                )?)
            }
            GatewayMode::Unconfigured => {
                warn!("payment gateway not configured; order creation is disabled");
                Arc::new(UnconfiguredPaymentGateway)
            }
        };
        let verifier = settings
            .signature_secret()
            .map(|secret| SignatureVerifier::new(secret.as_str()));
        if verifier.is_none() {
            warn!("payment key secret not configured; signature verification is disabled");
        }
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            cors_allowed_origins: settings.cors_allowed_origins()?,
            payments: PaymentService::new(gateway, verifier),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
