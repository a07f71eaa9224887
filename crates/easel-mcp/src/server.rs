use std::borrow::Cow;
use std::sync::Arc;

use easel_imagegen::{GenerationRequest, ImageRequestAdapter, StatusSink};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, SetLevelRequestParam},
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::status::{ClientLogLevel, PeerStatus};

/// MCP server exposing the `generate_image` tool
///
/// One instance serves one session; the requested logging level is kept
/// per session.
#[derive(Clone)]
pub struct EaselServer {
    adapter: Arc<ImageRequestAdapter>,
    logging_level: ClientLogLevel,
    tool_router: ToolRouter<Self>,
}

impl EaselServer {
    pub fn new(adapter: Arc<ImageRequestAdapter>) -> Self {
        Self {
            adapter,
            logging_level: ClientLogLevel::default(),
            tool_router: Self::tool_router(),
        }
    }
}

/// Raw `generate_image` arguments
///
/// Advertises the [`GenerationRequest`] schema but accepts any object, so
/// malformed arguments come back as a failed tool result instead of a
/// protocol error.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ToolArguments(Map<String, Value>);

impl JsonSchema for ToolArguments {
    fn schema_name() -> Cow<'static, str> {
        GenerationRequest::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        GenerationRequest::json_schema(generator)
    }
}

#[tool_router]
impl EaselServer {
    #[tool(
        description = "Generate an image from a text prompt using the host's configured image backend. Returns the image as a reference, markdown image or HTML."
    )]
    async fn generate_image(
        &self,
        Parameters(ToolArguments(arguments)): Parameters<ToolArguments>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let status = PeerStatus::new(context.peer.clone(), self.logging_level.clone());
        Ok(call_generate_image(&self.adapter, Value::Object(arguments), &status).await)
    }
}

#[tool_handler]
impl ServerHandler for EaselServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_logging()
                .build(),
            server_info: Implementation {
                name: "easel".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Call generate_image with a descriptive prompt and optional width, height and steps. \
                 Show the returned result to the user as-is."
                    .into(),
            ),
            ..Default::default()
        }
    }

    fn set_level(
        &self,
        request: SetLevelRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<(), McpError>> + Send + '_ {
        tracing::debug!(level = ?request.level, "client set logging level");
        self.logging_level.set(request.level);
        std::future::ready(Ok(()))
    }
}

/// Run one invocation from raw arguments and shape the outcome as a tool result
///
/// Failures, including arguments that do not parse, are reported as an
/// error result rather than a protocol error, so the model sees the reason.
pub async fn call_generate_image(
    adapter: &ImageRequestAdapter,
    arguments: Value,
    status: &dyn StatusSink,
) -> CallToolResult {
    match adapter.generate_image_from_json(arguments, status).await {
        Ok(output) => CallToolResult::success(vec![Content::text(output)]),
        Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
    }
}
