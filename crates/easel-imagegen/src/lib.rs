#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

mod adapter;
pub mod backend;
pub mod emit;
pub mod encode;
mod error;
mod reference;
mod request;
mod status;

use std::sync::Arc;

pub use adapter::{ImageRequestAdapter, alt_text};
pub use backend::{ImageBackend, OpenWebUiBackend};
pub use error::{ImageGenError, Result};
pub use reference::{GenerationResult, ImageReference, first_image};
pub use request::GenerationRequest;
pub use status::{LogStatus, NoStatus, StatusSink};

/// Build the image request adapter from configuration
///
/// # Errors
///
/// Returns an error if the configured backend cannot be initialized
pub fn build_adapter(config: &easel_config::Config) -> anyhow::Result<Arc<ImageRequestAdapter>> {
    let backend = backend::from_config(&config.backend)
        .map_err(|e| anyhow::anyhow!("Failed to initialize image backend: {e}"))?;

    Ok(Arc::new(ImageRequestAdapter::new(backend, config)))
}
