use easel_core::HttpError;
use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Failures of a single `generate_image` invocation
///
/// Every variant is reported to the host as a failed tool call; nothing is
/// retried and no partial image is returned.
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Bad or missing prompt, or parameters outside the configured bounds
    #[error("invalid request: {0}")]
    Validation(String),

    /// Backend unreachable, generation failed, or no image came back
    #[error("image generation failed: {0}")]
    Generation(String),

    /// Generated image could not be read or converted to base64
    #[error("image encoding failed: {0}")]
    Encoding(String),

    /// None of the enabled emission methods could render the image
    #[error("image emission failed: {0}")]
    Emission(String),

    /// Backend could not be built from configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::Encoding(_) | Self::Emission(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Generation(_) => "generation_error",
            Self::Encoding(_) => "encoding_error",
            Self::Emission(_) => "emission_error",
            Self::Config(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Config(_) => "image generation tool is misconfigured".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_map_to_bad_gateway() {
        let err = ImageGenError::Generation("backend returned 500: ComfyUI offline".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_type(), "generation_error");
        assert!(err.client_message().contains("ComfyUI offline"));
    }

    #[test]
    fn config_details_are_not_exposed() {
        let err = ImageGenError::Config("failed to build TLS backend".to_string());
        assert_eq!(err.client_message(), "image generation tool is misconfigured");
    }
}
