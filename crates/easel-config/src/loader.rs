use std::path::Path;

use crate::{Config, OPENAPI_PATH, TOOL_PATH};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if limits are zero, the valves leave the adapter
    /// without an emission method or accepted file format, or the HTTP
    /// routes are malformed or collide
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_limits()?;
        self.validate_valves()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_limits(&self) -> anyhow::Result<()> {
        let limits = &self.limits;

        if limits.max_width == 0 || limits.max_height == 0 {
            anyhow::bail!("limits.max_width and limits.max_height must be greater than 0");
        }

        if limits.max_steps == 0 {
            anyhow::bail!("limits.max_steps must be greater than 0");
        }

        Ok(())
    }

    fn validate_valves(&self) -> anyhow::Result<()> {
        let valves = &self.valves;

        if valves.emission_order().is_empty() {
            anyhow::bail!("valves.emission_priority must list at least one emission method");
        }

        if valves.max_file_size_mb == 0 {
            anyhow::bail!("valves.max_file_size_mb must be greater than 0");
        }

        if valves.supported_formats.iter().all(|f| f.trim().is_empty()) {
            anyhow::bail!("valves.supported_formats must list at least one file extension");
        }

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let server = &self.server;
        let mcp_path = server.mcp_path.as_str();

        if !mcp_path.starts_with('/') || mcp_path.len() < 2 {
            anyhow::bail!("server.mcp_path must start with '/' and name a sub-path");
        }

        let mut routes = vec![
            ("server.mcp_path", mcp_path),
            ("tool endpoint", TOOL_PATH),
            ("OpenAPI document", OPENAPI_PATH),
        ];

        if server.health.enabled {
            if !server.health.path.starts_with('/') {
                anyhow::bail!("server.health.path must start with '/'");
            }
            routes.push(("server.health.path", server.health.path.as_str()));
        }

        for (i, (name, path)) in routes.iter().enumerate() {
            for (other_name, other_path) in &routes[i + 1..] {
                if path == other_path {
                    anyhow::bail!("{name} and {other_name} both use '{path}'");
                }
            }

            if *name != "server.mcp_path" && is_below(path, mcp_path) {
                anyhow::bail!("{name} '{path}' is shadowed by server.mcp_path '{mcp_path}'");
            }
        }

        Ok(())
    }
}

/// Whether `path` lies under the nested service mounted at `prefix`
fn is_below(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix.trim_end_matches('/'))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
