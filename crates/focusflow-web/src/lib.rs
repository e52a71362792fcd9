//! Web interface for FocusFlow.
//!
//! An HTTP server that exposes the scheduling assistant to a browser:
//!
//! - A REST API for chat, chat history, schedule generation and retrieval,
//!   goals, and a health probe.
//! - An embedded single-page HTML frontend served at `/`.
//!
//! Every API request carries its identity in the `X-User` header; unknown
//! users are created on first use.

pub mod api;
pub mod frontend;
pub mod server;
pub mod state;

pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5000,
        }
    }
}
