//! HTTP method semantics surfaced as MCP tool annotations.

use reqwest::Method;
use rmcp::model::ToolAnnotations;

/// Behavior hints derived from the operation's HTTP method.
///
/// GET/HEAD/OPTIONS are safe and idempotent reads; POST creates;
/// PUT/DELETE mutate idempotently; PATCH mutates without an idempotency
/// guarantee. Every proxied tool talks to an external service, so the
/// open-world hint is always set.
#[must_use]
pub fn annotations_for_method(method: &Method) -> ToolAnnotations {
    let (read_only, destructive, idempotent) = match method.as_str() {
        "GET" | "HEAD" | "OPTIONS" => (Some(true), Some(false), Some(true)),
        "POST" => (Some(false), Some(false), Some(false)),
        "PUT" | "DELETE" => (Some(false), Some(true), Some(true)),
        "PATCH" => (Some(false), Some(true), None),
        _ => (None, None, None),
    };
    ToolAnnotations {
        title: None,
        read_only_hint: read_only,
        destructive_hint: destructive,
        idempotent_hint: idempotent,
        open_world_hint: Some(true),
    }
}
