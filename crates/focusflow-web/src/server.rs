//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and runs
//! the HTTP listener.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use focusflow_llm::Assistant;
use focusflow_store::Database;

use crate::api;
use crate::frontend::INDEX_HTML;
use crate::state::AppState;
use crate::WebConfig;

/// The FocusFlow web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server over a migrated database and a configured
    /// assistant.
    pub fn new(config: WebConfig, db: Database, assistant: Assistant) -> Self {
        let state = Arc::new(AppState::new(db, assistant));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin("*".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(tower_http::cors::Any);

        Router::new()
            // Embedded frontend.
            .route("/", get(|| async { Html(INDEX_HTML) }))
            // REST API.
            .route("/api/health", get(api::health))
            .route("/api/chat", post(api::chat))
            .route("/api/chat/history", get(api::chat_history))
            .route("/api/generate-schedule", post(api::generate_schedule))
            .route("/api/schedule", get(api::get_schedule))
            .route("/api/goals", get(api::goals))
            .layer(cors)
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let router = self.router();

        tracing::info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

// ── tests ────────────────────────────────────────────────────────────
