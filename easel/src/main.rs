#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use easel_config::{Config, Transport};
use easel_mcp::EaselServer;
use easel_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration and apply CLI overrides
    let mut config = Config::load(&args.config)?;
    if let Some(transport) = args.transport {
        config.server.transport = transport.into();
    }
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    // Initialize telemetry
    let log_filter = args
        .log_filter
        .clone()
        .unwrap_or_else(|| config.valves.log_level.as_filter().to_string());
    let _telemetry_guard = easel_telemetry::init(config.telemetry.as_ref(), &log_filter)?;

    tracing::info!(
        config_path = %args.config.display(),
        transport = ?config.server.transport,
        backend = %config.backend.base_url,
        "starting easel"
    );

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    match config.server.transport {
        Transport::Stdio => {
            let adapter = easel_imagegen::build_adapter(&config)?;
            easel_mcp::serve_stdio(EaselServer::new(adapter), shutdown).await?;
        }
        Transport::Http => {
            Server::new(&config)?.serve(shutdown).await?;
        }
    }

    tracing::info!("easel stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
