//! The MCP service surface over the tool registry.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ServerHandler, model};
use sandbox_openapi_tools::error::AdapterError;
use sandbox_openapi_tools::runtime::ToolRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Serves the registry's tools over MCP.
///
/// The registry is immutable after bootstrap, so the handler is a cheap
/// clone of two shared handles. The cancellation token is tripped on
/// process shutdown to abort in-flight proxied calls.
#[derive(Clone)]
pub struct SandboxService {
    registry: Arc<ToolRegistry>,
    cancel: CancellationToken,
}

impl SandboxService {
    pub fn new(registry: Arc<ToolRegistry>, cancel: CancellationToken) -> Self {
        Self { registry, cancel }
    }
}

impl ServerHandler for SandboxService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Tools proxied to the sandbox HTTP API. Call them with the arguments \
                 declared in each tool's input schema."
                    .to_string(),
            ),
            ..ServerInfo::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = request.arguments.unwrap_or_else(model::JsonObject::new);

        match self
            .registry
            .call_tool(&request.name, &arguments, &self.cancel)
            .await
        {
            Ok(result) => Ok(result),
            Err(AdapterError::UnknownTool(name)) => Err(ErrorData::invalid_params(
                format!("Tool not found: {name}"),
                None,
            )),
            // Invocation failures keep the serving loop alive.
            Err(e) => {
                tracing::warn!("Tool call '{}' failed: {e}", request.name);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}
