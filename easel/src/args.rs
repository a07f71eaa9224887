use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use easel_config::Transport;

/// Easel image generation tool
#[derive(Debug, Parser)]
#[command(name = "easel", about = "Image generation tool for LLM chat hosts (MCP and OpenAPI)")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "easel.toml", env = "EASEL_CONFIG")]
    pub config: PathBuf,

    /// Override the configured transport
    #[arg(short, long, value_enum, env = "EASEL_TRANSPORT")]
    pub transport: Option<TransportArg>,

    /// Override the listen address of the HTTP transport
    #[arg(long, env = "EASEL_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive; defaults to the `log_level` valve
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    Stdio,
    Http,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}
