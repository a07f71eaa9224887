use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to the host and the model
    fn client_message(&self) -> String;

    /// JSON body shared by every HTTP error response
    fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetails {
                r#type: self.error_type().to_string(),
                message: self.client_message(),
            },
        }
    }
}

/// `{"error": {"type": ..., "message": ...}}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub r#type: String,
    pub message: String,
}
