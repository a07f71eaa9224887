//! Conversion of image references into something the host can embed
//!
//! Local files become `data:` URIs, inline base64 is checked and wrapped,
//! and URLs are left exactly as the backend returned them.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use easel_config::Valves;

use crate::error::{ImageGenError, Result};
use crate::reference::ImageReference;

const DEFAULT_MIME: &str = "image/png";

/// Resolve a reference into the `src` used by every emission method
pub async fn resolve(reference: &ImageReference, valves: &Valves) -> Result<String> {
    match reference {
        ImageReference::Url(url) => Ok(url.clone()),
        ImageReference::Inline(data) => inline_to_data_uri(data),
        ImageReference::LocalPath(path) => path_to_data_uri(path, valves).await,
    }
}

/// Read a local image file and embed it as a base64 `data:` URI
///
/// The file must be a regular file, no larger than the configured
/// limit, with one of the supported extensions.
pub async fn path_to_data_uri(path: &Path, valves: &Valves) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ImageGenError::Encoding(format!("cannot access {}: {e}", path.display())))?;

    if !metadata.is_file() {
        return Err(ImageGenError::Encoding(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let max_bytes = valves.max_file_size_bytes();
    if metadata.len() > max_bytes {
        return Err(ImageGenError::Encoding(format!(
            "{} is {} bytes, larger than the {} MB limit",
            path.display(),
            metadata.len(),
            valves.max_file_size_mb
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !valves.supports_extension(&extension) {
        return Err(ImageGenError::Encoding(format!(
            "unsupported image format '.{extension}' (supported: {})",
            valves.supported_formats.join(", ")
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ImageGenError::Encoding(format!("failed to read {}: {e}", path.display())))?;

    let mime = mime_for_extension(&extension);

    tracing::info!(
        path = %path.display(),
        mime,
        size_bytes = bytes.len(),
        "local image converted to data URI"
    );

    Ok(data_uri(mime, &BASE64.encode(&bytes)))
}

/// Wrap backend-supplied base64 into a `data:` URI
///
/// Payloads that already are `data:` URIs pass through; bare base64 must
/// decode, and its MIME type is sniffed from the decoded bytes.
pub fn inline_to_data_uri(data: &str) -> Result<String> {
    if data.starts_with("data:") {
        return Ok(data.to_string());
    }

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| ImageGenError::Encoding(format!("backend returned corrupt base64 data: {e}")))?;

    let mime = sniff_mime(&bytes).unwrap_or(DEFAULT_MIME);
    tracing::debug!(mime, size_bytes = bytes.len(), "inline image wrapped as data URI");

    Ok(data_uri(mime, &compact))
}

fn data_uri(mime: &str, payload: &str) -> String {
    format!("data:{mime};base64,{payload}")
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => DEFAULT_MIME,
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        _ => None,
    }
}
