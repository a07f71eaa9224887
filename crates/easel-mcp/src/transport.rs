use std::sync::Arc;
use std::time::Duration;

use easel_imagegen::ImageRequestAdapter;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::server::EaselServer;

/// Serve MCP over stdin/stdout until the client disconnects or `shutdown` fires
pub async fn serve_stdio(server: EaselServer, shutdown: CancellationToken) -> anyhow::Result<()> {
    tracing::info!("serving MCP over stdio");

    let service = rmcp::serve_server(server, rmcp::transport::io::stdio()).await?;

    let service_token = service.cancellation_token();
    let watcher = tokio::spawn(async move {
        shutdown.cancelled().await;
        service_token.cancel();
    });

    let reason = service.waiting().await?;
    watcher.abort();

    tracing::info!(?reason, "MCP stdio session ended");

    Ok(())
}

/// Streamable HTTP service, mounted by the HTTP server under the MCP path
///
/// Every session gets its own [`EaselServer`] over the shared adapter.
pub fn streamable_http_service(
    adapter: Arc<ImageRequestAdapter>,
) -> StreamableHttpService<EaselServer, LocalSessionManager> {
    let config = StreamableHttpServerConfig {
        sse_keep_alive: Some(Duration::from_secs(15)),
        stateful_mode: true,
        ..Default::default()
    };

    StreamableHttpService::new(
        move || Ok(EaselServer::new(Arc::clone(&adapter))),
        Arc::new(LocalSessionManager::default()),
        config,
    )
}
