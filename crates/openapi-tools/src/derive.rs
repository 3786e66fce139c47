//! Tool derivation: one tool descriptor per path/method pair.

use crate::document::{ApiDocument, Operation, ParameterSpec, PathItem, SchemaFragment};
use crate::error::{AdapterError, Result};
use crate::schema::FieldDescriptor;
use reqwest::Method;
use std::collections::HashSet;

/// One derived callable unit: everything needed to list the tool and to
/// reconstruct the real HTTP request at call time.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Parameters first, then body properties, merged into one flat
    /// namespace in document order.
    pub fields: Vec<FieldDescriptor>,
    pub method: Method,
    pub path: String,
}

/// Derive the complete ordered tool set from a parsed document.
///
/// Malformed path items and parameters degrade gracefully (skipped with a
/// warn); an operation that resolves no description fails the whole
/// derivation, since an undocumented tool is unusable by a calling agent.
///
/// # Errors
///
/// Returns an error when any operation lacks a resolvable description or
/// declares an unsupported HTTP method.
pub fn derive_tools(document: &ApiDocument) -> Result<Vec<ToolDescriptor>> {
    let mut tools = Vec::new();
    let mut reserved_names: HashSet<String> = HashSet::new();

    for (path, raw_item) in &document.paths {
        let item: PathItem = match serde_json::from_value(raw_item.clone()) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Skipping malformed path item '{path}': {e}");
                continue;
            }
        };

        for (method_name, operation) in item.operations() {
            let mut tool = derive_operation(path, method_name, operation)?;
            tool.name = reserve_unique_name(&mut reserved_names, &tool.name);
            tools.push(tool);
        }
    }

    Ok(tools)
}

fn derive_operation(path: &str, method_name: &str, op: &Operation) -> Result<ToolDescriptor> {
    let name = op
        .x_mcp_tool
        .clone()
        .or_else(|| op.summary.clone())
        .unwrap_or_else(|| path.to_string());

    let description = op
        .x_mcp_tool
        .clone()
        .or_else(|| op.summary.clone())
        .or_else(|| op.description.clone())
        .ok_or_else(|| {
            AdapterError::OpenApi(format!(
                "tool description required, no summary or description found for {path} {method_name}"
            ))
        })?;

    let mut fields: Vec<FieldDescriptor> = Vec::new();

    for raw_param in &op.parameters {
        let param: ParameterSpec = match serde_json::from_value(raw_param.clone()) {
            Ok(param) => param,
            Err(e) => {
                tracing::warn!("Skipping malformed parameter on {path} {method_name}: {e}");
                continue;
            }
        };
        let Some(param_name) = param.name else {
            tracing::warn!("Skipping nameless parameter on {path} {method_name}");
            continue;
        };
        merge_field(
            &mut fields,
            FieldDescriptor::from_fragment(param_name, &param.schema, param.required),
        );
    }

    if let Some(body) = op.request_body.as_ref().and_then(|b| b.json_schema()) {
        for (prop_name, raw_schema) in &body.properties {
            // A malformed property schema falls back to a plain string field.
            let fragment: SchemaFragment =
                serde_json::from_value(raw_schema.clone()).unwrap_or_default();
            let required = body.required.iter().any(|r| r == prop_name);
            merge_field(
                &mut fields,
                FieldDescriptor::from_fragment(prop_name.clone(), &fragment, required),
            );
        }
    }

    Ok(ToolDescriptor {
        name,
        description,
        fields,
        method: resolve_method(method_name)?,
        path: path.to_string(),
    })
}

/// Merge one field into the set. On a name collision the later write wins,
/// replacing the earlier field in place so its position is kept.
fn merge_field(fields: &mut Vec<FieldDescriptor>, field: FieldDescriptor) {
    if let Some(existing) = fields.iter_mut().find(|f| f.name == field.name) {
        *existing = field;
    } else {
        fields.push(field);
    }
}

fn resolve_method(method_name: &str) -> Result<Method> {
    match method_name {
        "get" => Ok(Method::GET),
        "put" => Ok(Method::PUT),
        "post" => Ok(Method::POST),
        "delete" => Ok(Method::DELETE),
        "options" => Ok(Method::OPTIONS),
        "head" => Ok(Method::HEAD),
        "patch" => Ok(Method::PATCH),
        "trace" => Ok(Method::TRACE),
        other => Err(AdapterError::Runtime(format!(
            "Unsupported HTTP method: {other}"
        ))),
    }
}

/// Reserve a unique tool name, suffixing `_1`, `_2`, ... on collision.
fn reserve_unique_name(reserved: &mut HashSet<String>, base: &str) -> String {
    if reserved.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 1usize;
    loop {
        let candidate = format!("{base}_{counter}");
        if reserved.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
