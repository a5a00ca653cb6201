//! # HTTP Server
//!
//! Combines the liveness and student routers, owns the store client, and
//! closes it once the server has drained.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::rest_api::{student_routes, StudentFacade};
use crate::storage::{DocumentStore, StoreClient};

use super::config::ServerConfig;
use super::observability_routes::health_routes;

/// HTTP server for the student service
pub struct HttpServer {
    config: ServerConfig,
    store: Arc<StoreClient>,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already constructed store client
    pub fn new(config: ServerConfig, store: Arc<StoreClient>) -> Self {
        let router = Self::build_router(&config, store.clone());
        Self {
            config,
            store,
            router,
        }
    }

    /// Connect to the configured store and create the server.
    ///
    /// A failed connection is logged and replaced by a disconnected client,
    /// so the server still starts and store routes answer with 500.
    pub async fn connect(config: ServerConfig) -> Self {
        let store = open_store(config.store_url.as_deref()).await;
        Self::new(config, Arc::new(store))
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &ServerConfig, store: Arc<StoreClient>) -> Router {
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let facade = StudentFacade::new(dyn_store);

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
            .merge(health_routes(store))
            .merge(student_routes(facade))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Store client shared by every request
    pub fn store(&self) -> &Arc<StoreClient> {
        &self.store
    }

    /// Get a handle to the router (for testing)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until Ctrl-C, then close the store
    pub async fn start(self) -> io::Result<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then close the store
    pub async fn start_with_shutdown<F>(self, signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(
            %addr,
            store = self.store.backend_name(),
            connected = self.store.is_connected(),
            "server is ready"
        );

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await;

        if let Err(e) = self.store.close().await {
            warn!(error = %e, "failed to close store");
        }
        info!("server stopped");

        served
    }
}

/// Connects to the store, falling back to a disconnected client on failure
pub async fn open_store(url: Option<&str>) -> StoreClient {
    match StoreClient::connect(url).await {
        Ok(client) => client,
        Err(e) => {
            error!(code = e.code(), error = %e, "store connection error");
            StoreClient::disconnected(e.to_string())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_creation() {
        let server = HttpServer::connect(ServerConfig::default()).await;
        assert_eq!(server.socket_addr(), "0.0.0.0:3000");
        // No store_url configured
        assert!(!server.store().is_connected());
    }

    #[tokio::test]
    async fn test_server_with_memory_store() {
        let config = ServerConfig {
            store_url: Some("memory://".into()),
            ..ServerConfig::with_port(8080)
        };
        let server = HttpServer::connect(config).await;
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        assert!(server.store().is_connected());
    }

    #[tokio::test]
    async fn test_invalid_store_url_falls_back() {
        let store = open_store(Some("mongodb://localhost")).await;
        assert!(!store.is_connected());
        assert_eq!(store.backend_name(), "disconnected");
    }

    #[tokio::test]
    async fn test_shutdown_closes_store() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            store_url: Some("memory://".into()),
            ..ServerConfig::with_port(0)
        };
        let server = HttpServer::connect(config).await;
        let store = server.store().clone();

        server.start_with_shutdown(async {}).await.unwrap();
        assert!(store.is_closed());
    }
}
