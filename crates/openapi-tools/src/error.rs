//! Error types for `sandbox-openapi-tools`.

use thiserror::Error;

/// Main error type for the OpenAPI tool adapter.
///
/// Configuration and document errors are fatal at bootstrap; invocation
/// errors are caught at the dispatch boundary and surfaced to the calling
/// agent as failed tool results.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (missing document location, missing base URL).
    #[error("Configuration error: {0}")]
    Config(String),

    /// OpenAPI errors (structural validation, unresolvable descriptions).
    #[error("OpenAPI error: {0}")]
    OpenApi(String),

    #[error("OpenAPI error: failed to fetch document from '{url}': {message}")]
    DocumentFetch { url: String, message: String },

    #[error("OpenAPI error: failed to read document file '{path}': {source}")]
    DocumentReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("OpenAPI error: failed to parse document from '{location}': {source}")]
    DocumentParse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Caller-supplied arguments rejected before dispatch.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Invocation routed to a tool name the registry does not hold.
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// Runtime errors (request construction, unsupported methods).
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Non-2xx responses from the proxied API.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Transport-level failures of the outbound request.
    #[error("Request error: {0}")]
    Request(String),

    #[error("Tool call timed out: {0}")]
    Timeout(String),

    #[error("Tool call cancelled")]
    Cancelled,

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
