use easel_config::LimitsConfig;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::{ImageGenError, Result};

/// Arguments of a `generate_image` tool call
///
/// Unknown fields such as `seed` or a custom workflow are accepted and
/// dropped; the backend's workflow is fixed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    /// Text description of the desired image
    #[schemars(description = "Text description of the image to generate")]
    pub prompt: String,
    /// Image width in pixels
    #[serde(default)]
    #[schemars(description = "Image width in pixels (optional)")]
    pub width: Option<u32>,
    /// Image height in pixels
    #[serde(default)]
    #[schemars(description = "Image height in pixels (optional)")]
    pub height: Option<u32>,
    /// Number of sampling steps
    #[serde(default)]
    #[schemars(description = "Number of sampling steps (optional)")]
    pub steps: Option<u32>,
}

impl GenerationRequest {
    /// Request with only a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: None,
            height: None,
            steps: None,
        }
    }

    /// Parse tool-call arguments
    ///
    /// Missing or mistyped fields are a validation failure of the call,
    /// reported the same way as out-of-range values.
    pub fn from_json(arguments: serde_json::Value) -> Result<Self> {
        serde_json::from_value(arguments).map_err(|e| ImageGenError::Validation(e.to_string()))
    }

    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub const fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// `"{width}x{height}"` when both dimensions are present
    pub fn size(&self) -> Option<String> {
        self.width
            .zip(self.height)
            .map(|(width, height)| format!("{width}x{height}"))
    }

    /// Check the request against the configured bounds
    ///
    /// Runs before any backend call; out-of-range values are rejected
    /// rather than clamped.
    pub fn validate(&self, limits: &LimitsConfig) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(ImageGenError::Validation("prompt must not be empty".to_string()));
        }

        check_bound("width", self.width, limits.max_width)?;
        check_bound("height", self.height, limits.max_height)?;
        check_bound("steps", self.steps, limits.max_steps)?;

        Ok(())
    }
}

fn check_bound(name: &str, value: Option<u32>, max: u32) -> Result<()> {
    match value {
        Some(0) => Err(ImageGenError::Validation(format!(
            "{name} must be a positive integer"
        ))),
        Some(value) if value > max => Err(ImageGenError::Validation(format!(
            "{name} must not exceed {max} (got {value})"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_only_is_valid() {
        GenerationRequest::new("a lighthouse at dusk")
            .validate(&LimitsConfig::default())
            .unwrap();
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let err = GenerationRequest::new("   ")
            .validate(&LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImageGenError::Validation(ref msg) if msg.contains("prompt")));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = GenerationRequest::new("a cat")
            .with_size(0, 512)
            .validate(&LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImageGenError::Validation(ref msg) if msg.contains("width")));
    }

    #[test]
    fn oversized_steps_are_rejected() {
        let limits = LimitsConfig {
            max_steps: 40,
            ..LimitsConfig::default()
        };
        let err = GenerationRequest::new("a cat")
            .with_steps(41)
            .validate(&limits)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid request: steps must not exceed 40 (got 41)");
    }

    #[test]
    fn bounds_are_inclusive() {
        let limits = LimitsConfig {
            max_width: 1024,
            max_height: 1024,
            max_steps: 30,
        };
        GenerationRequest::new("a cat")
            .with_size(1024, 1024)
            .with_steps(30)
            .validate(&limits)
            .unwrap();
    }

    #[test]
    fn size_requires_both_dimensions() {
        let mut request = GenerationRequest::new("a cat");
        request.width = Some(512);
        assert_eq!(request.size(), None);

        assert_eq!(request.with_size(512, 768).size().as_deref(), Some("512x768"));
    }

    #[test]
    fn seed_and_workflow_are_ignored() {
        let request: GenerationRequest = serde_json::from_value(serde_json::json!({
            "prompt": "a red fox",
            "steps": 25,
            "seed": 1234,
            "workflow": "{\"3\": {}}"
        }))
        .unwrap();

        assert_eq!(request, GenerationRequest::new("a red fox").with_steps(25));
    }

    #[test]
    fn malformed_arguments_are_validation_errors() {
        for arguments in [
            serde_json::json!({ "width": 512 }),
            serde_json::json!({ "prompt": "a red fox", "width": -512 }),
            serde_json::json!({ "prompt": "a red fox", "steps": "many" }),
            serde_json::json!("a red fox"),
        ] {
            let err = GenerationRequest::from_json(arguments.clone()).unwrap_err();
            assert!(matches!(err, ImageGenError::Validation(_)), "{arguments}");
        }
    }

    #[test]
    fn negative_dimensions_fail_to_parse() {
        let parsed = serde_json::from_value::<GenerationRequest>(serde_json::json!({
            "prompt": "a red fox",
            "width": -512
        }));
        assert!(parsed.is_err());
    }
}
