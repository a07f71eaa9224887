use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Image generation backend configuration
///
/// Workflow, sampler and LoRA selection belong to the host; the tool only
/// knows where to send prompts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Backend type
    #[serde(rename = "type")]
    pub backend_type: BackendType,
    /// Base URL of the host (e.g. `http://localhost:8080`)
    pub base_url: Url,
    /// Bearer token used against the host API
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Optional model override forwarded with each request
    #[serde(default)]
    pub model: Option<String>,
    /// Upper bound for a single generation call (e.g. "120s")
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub timeout: Option<Duration>,
}

/// Supported generation backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Open WebUI `/api/v1/images/generations`
    OpenWebui,
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    raw.map(|s| duration_str::parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}
