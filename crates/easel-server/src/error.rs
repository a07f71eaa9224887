use axum::Json;
use axum::response::{IntoResponse, Response};
use easel_core::HttpError;
use easel_imagegen::ImageGenError;

/// Error response wrapper that implements `IntoResponse`
pub struct ApiError(ImageGenError);

impl From<ImageGenError> for ApiError {
    fn from(e: ImageGenError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "tool call failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "tool call rejected");
        }

        (status, Json(self.0.to_body())).into_response()
    }
}
