//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use easel_config::{
    BackendConfig, BackendType, Config, EmissionMethod, HealthConfig, LimitsConfig, ServerConfig, Transport,
    UserValves, Valves,
};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder whose backend points at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    transport: Transport::Http,
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                backend: BackendConfig {
                    backend_type: BackendType::OpenWebui,
                    base_url: base_url.parse().expect("valid URL"),
                    api_key: Some(SecretString::from("test-key")),
                    model: None,
                    timeout: None,
                },
                limits: LimitsConfig::default(),
                valves: Valves::default(),
                user_valves: UserValves::default(),
                telemetry: None,
            },
        }
    }

    /// Replace the emission priority list
    pub fn with_emission_priority(mut self, priority: &[EmissionMethod]) -> Self {
        self.config.valves.emission_priority = priority.to_vec();
        self
    }

    /// Set the preferred emission method
    pub fn with_emission_method(mut self, method: EmissionMethod) -> Self {
        self.config.valves.emission_method = Some(method);
        self
    }

    /// Set the model forwarded with each request
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.backend.model = Some(model.to_owned());
        self
    }

    /// Move the health endpoint
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
