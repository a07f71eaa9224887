use std::path::PathBuf;

use serde_json::Value;

use crate::error::{ImageGenError, Result};

/// Fields searched, in order, when the backend answers with an object
const PRIORITY_FIELDS: [&str; 9] = [
    "url",
    "b64",
    "image",
    "data",
    "base64",
    "file_path",
    "path",
    "src",
    "image_url",
];

/// The single image produced for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_reference: ImageReference,
}

/// Where the generated image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// File on the local filesystem, embedded as base64 before emission
    LocalPath(PathBuf),
    /// URL or host-assigned identifier, passed through unchanged
    Url(String),
    /// Base64 payload or `data:` URI supplied directly by the backend
    Inline(String),
}

impl ImageReference {
    /// Classify a bare string returned by the backend
    ///
    /// Only an existing regular file counts as a local path; anything else
    /// is treated as a host reference.
    pub async fn classify(value: &str) -> Self {
        if value.starts_with("data:") {
            Self::Inline(value.to_string())
        } else if is_regular_file(value).await {
            Self::LocalPath(PathBuf::from(value))
        } else {
            Self::Url(value.to_string())
        }
    }

    /// Extract a reference from one item of a backend response
    pub async fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self::classify(s).await),
            Value::Object(map) => {
                for field in PRIORITY_FIELDS {
                    let Some(value) = map.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()) else {
                        continue;
                    };
                    if let Some(reference) = reference_for_field(field, value).await {
                        return Some(reference);
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Short description for logs; never includes base64 payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LocalPath(_) => "local_path",
            Self::Url(_) => "url",
            Self::Inline(_) => "inline",
        }
    }
}

async fn is_regular_file(value: &str) -> bool {
    tokio::fs::metadata(value)
        .await
        .is_ok_and(|metadata| metadata.is_file())
}

async fn reference_for_field(field: &str, value: &str) -> Option<ImageReference> {
    match field {
        "url" | "file_path" | "path" => Some(ImageReference::classify(value).await),
        "b64" | "base64" => Some(ImageReference::Inline(value.to_string())),
        _ if value.starts_with("data:") => Some(ImageReference::Inline(value.to_string())),
        _ if value.starts_with("http://") || value.starts_with("https://") => {
            Some(ImageReference::Url(value.to_string()))
        }
        _ => None,
    }
}

/// Pick the generated image out of a backend response
///
/// The response may be a list or a single item. Exactly one image is used
/// per request; extra images are logged and dropped.
pub async fn first_image(response: &Value) -> Result<GenerationResult> {
    let items: &[Value] = match response {
        Value::Null => &[],
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };

    let Some(first) = items.first() else {
        return Err(ImageGenError::Generation("backend returned no image".to_string()));
    };

    if items.len() > 1 {
        tracing::warn!(count = items.len(), "backend returned several images, using the first");
    }

    let image_reference = ImageReference::from_value(first).await.ok_or_else(|| {
        ImageGenError::Generation("backend response did not contain a usable image reference".to_string())
    })?;

    tracing::debug!(kind = image_reference.kind(), "image reference extracted");

    Ok(GenerationResult { image_reference })
}
