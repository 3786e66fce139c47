//! The tool registry: bootstrap, listing, and invocation routing.

use crate::config::AdapterConfig;
use crate::derive::{ToolDescriptor, derive_tools};
use crate::dispatch::{CallContent, Dispatcher};
use crate::document::load_document;
use crate::error::{AdapterError, Result};
use crate::schema::build_input_schema;
use crate::semantics::annotations_for_method;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The immutable tool set bound to its dispatcher.
///
/// Built once at startup and shared read-only for the process lifetime; no
/// partial registry is ever exposed, any bootstrap failure is fatal.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    dispatcher: Dispatcher,
}

impl ToolRegistry {
    /// Bootstrap the dynamic binding: load the OpenAPI document, validate
    /// its structural minimum, and derive the full tool set.
    ///
    /// # Errors
    ///
    /// Returns an error when the document location is missing, the document
    /// cannot be loaded, it lacks `servers[0].url` or any path, or any
    /// operation fails derivation.
    pub async fn bootstrap_openapi(config: &AdapterConfig) -> Result<Self> {
        let location = config.document.as_deref().ok_or_else(|| {
            AdapterError::Config("no OpenAPI document location configured".to_string())
        })?;

        let client = reqwest::Client::new();
        let document = load_document(&client, location).await?;

        let base_url = document.base_url()?.to_string();
        document.ensure_paths()?;

        let tools = derive_tools(&document)?;
        tracing::info!("Derived {} tools from {location}", tools.len());

        Ok(Self {
            tools,
            dispatcher: Dispatcher::new(client, base_url, config.api_key.clone(), config.call_timeout()),
        })
    }

    /// Build a registry from a hand-declared tool table (the static binding).
    #[must_use]
    pub fn from_table(tools: Vec<ToolDescriptor>, base_url: String, config: &AdapterConfig) -> Self {
        Self {
            tools,
            dispatcher: Dispatcher::new(
                reqwest::Client::new(),
                base_url,
                config.api_key.clone(),
                config.call_timeout(),
            ),
        }
    }

    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Render the registry as MCP `Tool`s.
    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|t| {
                let schema_obj = build_input_schema(&t.fields)
                    .as_object()
                    .cloned()
                    .unwrap_or_else(JsonObject::new);
                let mut tool = Tool::new(t.name.clone(), t.description.clone(), Arc::new(schema_obj));
                tool.annotations = Some(annotations_for_method(&t.method));
                tool
            })
            .collect()
    }

    /// Route one invocation by tool name and dispatch it.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnknownTool`] for names the registry does not
    /// hold; dispatch errors propagate unchanged.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: &JsonObject,
        cancel: &CancellationToken,
    ) -> Result<CallToolResult> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| AdapterError::UnknownTool(name.to_string()))?;

        match self.dispatcher.call(tool, arguments, cancel).await? {
            CallContent::Text(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            CallContent::Rich(items) => Ok(CallToolResult::success(rich_items_to_content(items))),
        }
    }
}

/// Convert pass-through rich items into MCP content. An item that does not
/// decode as protocol content degrades to its JSON text.
fn rich_items_to_content(items: Vec<Value>) -> Vec<Content> {
    items
        .into_iter()
        .map(|item| match serde_json::from_value::<Content>(item.clone()) {
            Ok(content) => content,
            Err(_) => Content::text(item.to_string()),
        })
        .collect()
}
