//! Server construction.

mod config;

pub use config::{ServerConfig, ServerConfigError};

use actix_web::dev::{Server, ServerHandle};
use actix_web::{HttpServer, web};
use tracing::{info, warn};

use backend::app::{AppDependencies, build_app};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing binding, CORS and payment settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener. Signal
/// handling is left to [`drain_on_signal`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        cors_allowed_origins,
        payments,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(HttpState::new(payments)),
        cors_allowed_origins,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .disable_signals()
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Wait for SIGINT or SIGTERM, then [`drain`] the server.
pub async fn drain_on_signal(health_state: web::Data<HealthState>, handle: ServerHandle) {
    match shutdown_signal().await {
        Ok(()) => drain(&health_state, handle).await,
        Err(e) => warn!(error = %e, "shutdown signal listener failed"),
    }
}

/// Fail liveness probes, then stop accepting work and let in-flight requests
/// finish.
pub async fn drain(health_state: &HealthState, handle: ServerHandle) {
    health_state.mark_unhealthy();
    info!("draining in-flight requests before shutdown");
    handle.stop(true).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse};

    #[actix_web::test]
    async fn draining_fails_liveness_and_stops_the_server() {
        let health_state = web::Data::new(HealthState::new());
        let server = HttpServer::new(|| {
            App::new().default_service(web::to(|| async { HttpResponse::Ok().finish() }))
        })
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("bind ephemeral port")
            .run();
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain(&health_state, handle).await;

        assert!(!health_state.is_alive());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }
}
