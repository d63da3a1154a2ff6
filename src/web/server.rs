//! Restock server implementation
//!
//! Wires the record store, views and configuration into an axum router and
//! serves it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::barcode::BarcodeRenderer;
use crate::config::Config;
use crate::models::DuplicatePolicy;
use crate::store::{InMemoryStore, RecordStore};

use super::api::create_router;
use super::views::Views;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Report records
    pub store: Arc<dyn RecordStore>,

    /// Registered templates
    pub views: Arc<Views>,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Build state around an existing store
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Result<Self, ServerError> {
        let views = Views::new(
            config.i18n.lang.clone(),
            config.reports.poll_interval_ms,
            BarcodeRenderer::new(config.barcode.height),
        )
        .map_err(|e| ServerError::InitError(e.to_string()))?;

        Ok(Self {
            store,
            views: Arc::new(views),
            start_time: Instant::now(),
            config,
        })
    }

    /// Locale for messages and pages
    pub fn locale(&self) -> &str {
        &self.config.i18n.lang
    }
}

// ============================================================================
// Restock Server
// ============================================================================

/// Main restock server
pub struct RestockServer {
    config: Config,
    state: AppState,
}

impl RestockServer {
    /// Create a server backed by a fresh in-memory store
    pub fn new(config: Config) -> Result<Self, ServerError> {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Create a server backed by the given store
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        let state = AppState::new(config.clone(), store)?;

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.bind_address()?;

        tracing::info!(
            %addr,
            duplicate_policy = %self.config.reports.duplicate_policy,
            locale = %self.config.i18n.lang,
            "Starting restock server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Restock server shutdown complete");
        Ok(())
    }

    fn bind_address(&self) -> Result<SocketAddr, ServerError> {
        self.config
            .bind_address()
            .map_err(|e| ServerError::ConfigError(e.to_string()))
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            host: self.config.server.host.clone(),
            port: self.config.server.port,
            duplicate_policy: self.config.reports.duplicate_policy,
            poll_interval_ms: self.config.reports.poll_interval_ms,
            locale: self.config.i18n.lang.clone(),
            cors_enabled: self.config.server.enable_cors,
            request_logging_enabled: self.config.server.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub duplicate_policy: DuplicatePolicy,
    pub poll_interval_ms: u64,
    pub locale: String,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "Restock Server\n\
             {:-<40}\n\
             Bind Address: {}:{}\n\
             Duplicate Policy: {}\n\
             Poll Interval: {}ms\n\
             Locale: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.host,
            self.port,
            self.duplicate_policy,
            self.poll_interval_ms,
            self.locale,
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Failed to bind: {0}")]
    BindError(String),

    #[error("Server error: {0}")]
    ServeError(String),
}

// ============================================================================
// Tests
// ============================================================================
