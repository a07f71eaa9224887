#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod health;
mod tool;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use easel_config::Config;
use easel_imagegen::ImageRequestAdapter;
use tower_http::trace::TraceLayer;

pub use easel_config::{OPENAPI_PATH, TOOL_PATH};
pub use tool::openapi_document;

/// Default bind address when none is configured
const DEFAULT_LISTEN_ADDRESS: ([u8; 4], u16) = ([127, 0, 0, 1], 8600);

/// Assembled HTTP server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the image
    /// backend cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let adapter = easel_imagegen::build_adapter(config)?;
        Self::with_adapter(config, adapter)
    }

    /// Build the server around an existing adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the configured routes are invalid or collide
    pub fn with_adapter(config: &Config, adapter: Arc<ImageRequestAdapter>) -> anyhow::Result<Self> {
        config.validate()?;

        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_LISTEN_ADDRESS));

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // OpenAPI tool endpoint
        app = app.merge(tool::tool_router(Arc::clone(&adapter)));

        // MCP over Streamable HTTP
        let mcp_service = easel_mcp::streamable_http_service(adapter);
        app = app.nest_service(&config.server.mcp_path, mcp_service);

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
