pub(crate) mod open_webui;

use std::sync::Arc;

use async_trait::async_trait;
use easel_config::{BackendConfig, BackendType};

use crate::{error::Result, reference::GenerationResult, request::GenerationRequest};

pub use open_webui::OpenWebUiBackend;

/// An image generation service the adapter can call
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate one image for an already validated request
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Build the configured backend
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn ImageBackend>> {
    tracing::debug!(backend = ?config.backend_type, base_url = %config.base_url, "initializing image backend");

    let backend: Arc<dyn ImageBackend> = match config.backend_type {
        BackendType::OpenWebui => Arc::new(OpenWebUiBackend::new(config)?),
    };

    Ok(backend)
}
