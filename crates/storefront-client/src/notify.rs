//! Presentation callbacks invoked once a call settles.

use tracing::{error, info, warn};

use crate::error::ClientError;

/// Receives user-facing outcomes of API calls.
///
/// Retried attempts are never reported; only the final outcome is.
pub trait Notifier: Send + Sync {
    /// The call succeeded and a success message was requested.
    fn success(&self, message: &str);
    /// The call failed for good.
    fn error(&self, error: &ClientError);
    /// The call failed in a way the user can recover from by waiting.
    fn warning(&self, error: &ClientError);
}

/// Notifier that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn success(&self, _message: &str) {}

    fn error(&self, _error: &ClientError) {}

    fn warning(&self, _error: &ClientError) {}
}

/// Notifier that writes outcomes to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(detail = %message, "api call succeeded");
    }

    fn error(&self, failure: &ClientError) {
        error!(
            code = failure.code(),
            status = failure.status(),
            correlation_id = failure.correlation_id(),
            detail = failure.message(),
            "api call failed"
        );
    }

    fn warning(&self, failure: &ClientError) {
        warn!(
            code = failure.code(),
            status = failure.status(),
            correlation_id = failure.correlation_id(),
            detail = failure.message(),
            "api call throttled"
        );
    }
}
