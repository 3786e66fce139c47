//! Permissive model of the OpenAPI 3.x subset consumed by the tool deriver.
//!
//! The document is treated purely as a source of tool derivation, never
//! executed or validated beyond structural necessity. Decoding is lenient on
//! purpose: one malformed parameter or property must not fail an otherwise
//! usable document, so leaves decode with fallbacks instead of strict types.
//! `$ref` is not resolved.

use crate::error::{AdapterError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// Top-level OpenAPI document, reduced to the fields derivation needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiDocument {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,

    /// Path -> path item, in document order. Items stay untyped here so a
    /// malformed path item can be skipped instead of failing the parse.
    #[serde(default)]
    pub paths: serde_json::Map<String, Value>,
}

impl ApiDocument {
    /// The base server URL the dispatcher targets.
    ///
    /// # Errors
    ///
    /// A missing or empty `servers[0].url` is a hard configuration error:
    /// without it no derived tool could ever be dispatched.
    pub fn base_url(&self) -> Result<&str> {
        match self.servers.first().map(|s| s.url.as_str()) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(AdapterError::OpenApi(
                "no servers[0].url found in the document".to_string(),
            )),
        }
    }

    /// Require at least one path.
    ///
    /// # Errors
    ///
    /// An empty `paths` mapping is a hard configuration error.
    pub fn ensure_paths(&self) -> Result<()> {
        if self.paths.is_empty() {
            return Err(AdapterError::OpenApi(
                "no api paths found in the document".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerEntry {
    #[serde(default)]
    pub url: String,
}

/// One path item: the operations declared under a path, keyed by method.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Declared operations in the fixed method order used for derivation.
    pub fn operations(&self) -> impl Iterator<Item = (&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
            ("trace", &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
    }
}

/// One OpenAPI operation. Parameters stay untyped so a single malformed
/// entry can be skipped during derivation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Custom extension naming the exposed tool explicitly.
    #[serde(default, rename = "x_mcp_tool")]
    pub x_mcp_tool: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

/// One declared parameter: `{name, required?, schema}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterSpec {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub schema: SchemaFragment,
}

/// One parameter or property schema fragment: a primitive `type` plus an
/// optional human-readable description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFragment {
    /// Declared primitive type. Kept untyped: unrecognized or malformed
    /// values fall back to string during translation.
    #[serde(default, rename = "type")]
    pub schema_type: Option<Value>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A declared request body, keyed by media type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: HashMap<String, Value>,
}

impl RequestBody {
    /// The `application/json` object schema, when one is declared. Anything
    /// that does not decode as an object schema contributes no fields.
    #[must_use]
    pub fn json_schema(&self) -> Option<BodySchema> {
        let schema = self.content.get("application/json")?.get("schema")?;
        serde_json::from_value(schema.clone()).ok()
    }
}

/// An object schema with named properties and a `required` name list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BodySchema {
    /// Property name -> schema fragment, in document order.
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,

    #[serde(default)]
    pub required: Vec<String>,
}

/// Load and parse the OpenAPI document from a URL or a file path.
///
/// JSON is a valid subset of YAML, so `serde_yaml` alone covers both formats.
///
/// # Errors
///
/// Returns an error when the document cannot be fetched, read, or parsed.
pub async fn load_document(client: &reqwest::Client, location: &str) -> Result<ApiDocument> {
    let content = if location.starts_with("http://") || location.starts_with("https://") {
        tracing::info!("Fetching OpenAPI document from {location}");
        let url = Url::parse(location).map_err(|e| {
            AdapterError::OpenApi(format!("Invalid document URL '{location}': {e}"))
        })?;
        let resp = client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::DocumentFetch {
                url: location.to_string(),
                message: e.to_string(),
            })?;
        resp.text().await.map_err(|e| AdapterError::DocumentFetch {
            url: location.to_string(),
            message: e.to_string(),
        })?
    } else {
        tracing::info!("Loading OpenAPI document from {location}");
        std::fs::read_to_string(location).map_err(|e| AdapterError::DocumentReadFile {
            path: location.to_string(),
            source: e,
        })?
    };

    let doc: ApiDocument =
        serde_yaml::from_str(&content).map_err(|e| AdapterError::DocumentParse {
            location: location.to_string(),
            source: e,
        })?;

    Ok(doc)
}
