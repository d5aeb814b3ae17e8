//! HTTP server implementation for the trivia API.
//!
//! Routes the three API endpoints to the database layer and serializes
//! results as JSON. Each request performs exactly one query or insert;
//! the connection pool is the only shared resource.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use cluebase_core::{Error, Result, StatEntry};
use cluebase_db::Database;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable permissive CORS so browser frontends on other origins can
    /// call the API.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:7070".parse().unwrap(),
            cors: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            cors: self.cors.unwrap_or(defaults.cors),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// The pooled database handle.
    pub db: Database,
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server over the given database handle.
    pub fn new(config: ServerConfig, db: Database) -> Self {
        let state = Arc::new(AppState { db });
        Self { config, state }
    }

    /// Creates the router.
    fn router(&self) -> Router {
        let mut router = Router::new()
            // Health endpoints
            .route("/health", get(health))
            .route("/ready", get(ready))
            // Trivia API endpoints
            .route("/api/topics", get(list_topics))
            .route("/api/clues", get(get_clues))
            .route("/api/stats", post(record_stat))
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails
    /// while serving.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        tracing::info!(addr = %self.config.addr, "Starting Cluebase server");
        eprintln!(
            "\n\x1b[32m✓\x1b[0m Server listening on http://{}",
            self.config.addr
        );
        eprintln!("  Press Ctrl+C to stop\n");

        let listener = tokio::net::TcpListener::bind(self.config.addr)
            .await
            .map_err(cluebase_core::Error::Io)?;

        let shutdown_signal = async {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install signal handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                () = ctrl_c => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received Ctrl+C, shutting down gracefully...");
                },
                () = terminate => {
                    eprintln!("\n\x1b[33m⚡\x1b[0m Received SIGTERM, shutting down gracefully...");
                },
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(cluebase_core::Error::Io)?;

        tracing::info!("Server shutdown complete");
        eprintln!("\x1b[32m✓\x1b[0m Server stopped");

        Ok(())
    }
}

// === Error Response ===

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
            },
        }
    }
}

fn error_response(status: StatusCode, message: &str, error_type: &str) -> Response {
    let body = Json(ErrorResponse::new(message, error_type));
    (status, body).into_response()
}

// === Health Endpoints ===

async fn health() -> &'static str {
    "OK"
}

async fn ready(State(state): State<Arc<AppState>>) -> Response {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "Ready").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
        },
    }
}

// === Trivia API Endpoints ===

async fn list_topics(State(state): State<Arc<AppState>>) -> Response {
    match state.db.all_topics().await {
        Ok(topics) => Json(topics).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list topics");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list topics",
                "database_error",
            )
        },
    }
}

#[derive(Debug, Deserialize)]
struct CluesQuery {
    topic: Option<String>,
}

async fn get_clues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CluesQuery>,
) -> Response {
    let topic = match params.topic {
        Some(topic) => topic,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                "Missing required query parameter: topic",
            )
                .into_response();
        },
    };

    tracing::debug!(topic = %topic, "Clue batch request");

    match state.db.clues_by_topic(&topic).await {
        Ok(clues) => Json(clues).into_response(),
        // The blank-topic rejection carries a plain-text message, not the
        // JSON error envelope.
        Err(Error::InvalidInput { message }) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        },
        Err(e) => {
            tracing::error!(error = %e, topic = %topic, "Failed to fetch clues");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch clues",
                "database_error",
            )
        },
    }
}

async fn record_stat(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<StatEntry>,
) -> Response {
    tracing::debug!(topic = %entry.canonical_topic, passed = entry.passed, "Recording stat");

    match state.db.record_stat(&entry).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to record stat");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record stat",
                "database_error",
            )
        },
    }
}
