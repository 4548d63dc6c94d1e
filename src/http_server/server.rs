//! # HTTP Server
//!
//! Main HTTP server combining the `/memory`, `/db` and `/health` routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServerConfig};
use crate::store::{DocumentStore, InMemoryDocumentStore, InMemoryKeyValueStore, KeyValueStore};

use super::db_routes::{db_routes, DbState};
use super::health_routes::health_routes;
use super::memory_routes::{memory_routes, MemoryState};

/// Store handles injected into the handlers
#[derive(Clone)]
pub struct Stores {
    pub kv: Arc<dyn KeyValueStore>,
    pub documents: Arc<dyn DocumentStore>,
}

impl Stores {
    pub fn new(kv: Arc<dyn KeyValueStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { kv, documents }
    }

    /// Empty process-local stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(InMemoryDocumentStore::new()),
        )
    }
}

/// HTTP server for the gateway
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    documents: Arc<dyn DocumentStore>,
}

impl HttpServer {
    /// Create a new HTTP server over the given stores
    pub fn with_config(config: ServerConfig, stores: Stores) -> Self {
        let router = Self::build_router(&config, &stores);
        Self {
            config,
            router,
            documents: stores.documents,
        }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, stores: &Stores) -> Router {
        let memory_state = Arc::new(MemoryState::new(stores.kv.clone()));
        let db_state = Arc::new(DbState::new(stores.documents.clone()));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(memory_routes(memory_state))
            .merge(db_routes(db_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until a shutdown signal arrives, then release the document store
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        if let Err(e) = self.documents.close().await {
            tracing::warn!(error = %e, "document store did not close cleanly");
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
