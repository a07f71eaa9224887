use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use easel_config::{OPENAPI_PATH, TOOL_PATH};
use easel_imagegen::{GenerationRequest, ImageGenError, ImageRequestAdapter, LogStatus};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;

/// Routes of the OpenAPI tool server
pub fn tool_router(adapter: Arc<ImageRequestAdapter>) -> Router {
    Router::new()
        .route(TOOL_PATH, post(generate_image))
        .route(OPENAPI_PATH, get(openapi))
        .with_state(adapter)
}

/// Successful tool call
#[derive(Debug, Serialize)]
struct ToolResult {
    result: String,
}

async fn generate_image(
    State(adapter): State<Arc<ImageRequestAdapter>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<ToolResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ImageGenError::Validation(rejection.body_text()))?;

    tracing::debug!("generate_image tool called over HTTP");

    let result = adapter.generate_image(&request, &LogStatus).await?;

    Ok(Json(ToolResult { result }))
}

async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

/// OpenAPI description hosts use to import the tool
pub fn openapi_document() -> Value {
    let request_schema = schemars::schema_for!(GenerationRequest);

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "easel",
            "description": "Image generation through the host's configured backend",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            TOOL_PATH: {
                "post": {
                    "operationId": "generate_image",
                    "summary": "Generate an image from a text prompt",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": request_schema } }
                    },
                    "responses": {
                        "200": {
                            "description": "Embeddable image reference",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "result": { "type": "string" } },
                                        "required": ["result"]
                                    }
                                }
                            }
                        },
                        "400": { "description": "Invalid request" },
                        "502": { "description": "Image generation failed" },
                        "500": { "description": "Image could not be encoded or emitted" }
                    }
                }
            }
        }
    })
}
