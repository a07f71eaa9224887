use std::net::SocketAddr;

use serde::Deserialize;

use crate::health::HealthConfig;

/// Route of the OpenAPI tool endpoint
pub const TOOL_PATH: &str = "/tools/generate_image";

/// Route of the OpenAPI document describing the tool endpoint
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// How the host reaches the tool
    #[serde(default)]
    pub transport: Transport,
    /// Bind address for the HTTP transport
    pub listen_address: Option<SocketAddr>,
    /// Mount point of the MCP Streamable HTTP service
    #[serde(default = "default_mcp_path")]
    pub mcp_path: String,
    #[serde(default)]
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            listen_address: None,
            mcp_path: default_mcp_path(),
            health: HealthConfig::default(),
        }
    }
}

/// Tool transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// MCP over stdin/stdout
    #[default]
    Stdio,
    /// HTTP server with the tool endpoint and MCP over Streamable HTTP
    Http,
}

fn default_mcp_path() -> String {
    "/mcp".to_string()
}
