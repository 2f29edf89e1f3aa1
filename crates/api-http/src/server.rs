//! HTTP Server
//!
//! Serves the storefront REST API over TCP with permissive CORS.

use crate::handler::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 3001;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handler::health))
        .route("/api/products", get(handler::list_products))
        .route("/api/products/category/:name", get(handler::products_by_category))
        .route(
            "/api/products/public-category/:id",
            get(handler::products_by_public_category),
        )
        .route("/api/products/:id", get(handler::product_by_id))
        .route("/api/product/by-slug/:slug", get(handler::product_by_slug))
        .route("/api/categories", get(handler::list_categories))
        .route("/api/categories/tree", get(handler::category_tree))
        .route("/api/public-categories", get(handler::list_public_categories))
        .route("/api/public-categories/tree", get(handler::public_category_tree))
        .route("/api/search", get(handler::search))
        .route("/api/ribbons", get(handler::list_ribbons))
        .route("/api/contact", post(handler::submit_contact))
        .route("/api/cache/clear", post(handler::clear_cache))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and start serving in a background task
    ///
    /// Port 0 binds an ephemeral port; see [`ServerHandle::local_addr`].
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read local address: {}", e))?;

        info!(addr = %local_addr, "Starting HTTP server");

        let app = router(self.state);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!("HTTP server started successfully");

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> Result<(), String> {
        let _ = self.shutdown_tx.send(());
        self.task
            .await
            .map_err(|e| format!("Server task failed: {}", e))?
            .map_err(|e| format!("Server error: {}", e))
    }
}
