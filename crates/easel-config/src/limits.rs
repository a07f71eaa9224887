use serde::Deserialize;

/// Upper bounds for tool call parameters
///
/// Values above a bound are rejected, never clamped.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            max_steps: default_max_steps(),
        }
    }
}

const fn default_max_dimension() -> u32 {
    2048
}

const fn default_max_steps() -> u32 {
    150
}
