#![allow(clippy::must_use_candidate)]

pub mod backend;
mod env;
pub mod health;
pub mod limits;
mod loader;
pub mod server;
pub mod telemetry;
pub mod valves;

use serde::Deserialize;

pub use backend::*;
pub use health::*;
pub use limits::*;
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use valves::*;

/// Top-level Easel configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server and transport configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Image generation backend (the host's configured integration)
    pub backend: BackendConfig,
    /// Bounds applied to tool call parameters
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Administrator valves
    #[serde(default)]
    pub valves: Valves,
    /// Per-user valves
    #[serde(default)]
    pub user_valves: UserValves,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
