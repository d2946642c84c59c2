//! Helpers for running real HTTP servers on ephemeral ports.

use std::net::TcpListener;
use std::sync::Mutex;

use storefront_client::{ClientError, Notifier};

/// Serve the app built by the factory on `127.0.0.1:0` and evaluate to its
/// base URL.
macro_rules! spawn_server {
    ($factory:expr) => {{
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().expect("local addr").port();
        let server = actix_web::HttpServer::new($factory)
            .workers(1)
            .disable_signals()
            .listen(listener)
            .expect("listen")
            .run();
        actix_web::rt::spawn(server);
        format!("http://127.0.0.1:{port}/")
    }};
}

pub(crate) use spawn_server;

/// Base URL of a port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

/// Notifier that records what it was told.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(format!("success:{message}"));
    }

    fn error(&self, error: &ClientError) {
        self.push(format!("error:{}", error.code()));
    }

    fn warning(&self, error: &ClientError) {
        self.push(format!("warning:{}", error.code()));
    }
}
