//! Schema translation: OpenAPI schema fragments -> typed field descriptors.
//!
//! Also home of the tagged-value argument validation the dispatcher runs
//! before any HTTP work: malformed caller input is rejected with a typed
//! error instead of being silently stringified.

use crate::document::SchemaFragment;
use crate::error::{AdapterError, Result};
use serde_json::{Map, Value, json};

/// Primitive kind of one tool input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl FieldKind {
    /// Map a declared OpenAPI `type` onto a kind.
    ///
    /// Unrecognized, absent, or non-string declarations fall back to string:
    /// one malformed field must never fail the whole document.
    #[must_use]
    pub fn from_declared(declared: Option<&Value>) -> Self {
        match declared.and_then(Value::as_str) {
            Some("string") => Self::String,
            Some("number") => Self::Number,
            Some("integer") => Self::Integer,
            Some("boolean") => Self::Boolean,
            Some("array") => Self::Array,
            Some("object") => Self::Object,
            _ => Self::String,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether a caller-supplied JSON value inhabits this kind.
    ///
    /// Integers only admit integral numbers; every other kind maps onto its
    /// JSON counterpart.
    #[must_use]
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::String
    }
}

/// The translated form of one parameter or body property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub description: Option<String>,
    pub required: bool,
}

impl FieldDescriptor {
    /// Translate one schema fragment. The required flag comes from context:
    /// the parameter's own `required: true`, or membership in the enclosing
    /// body schema's `required` list. Descriptions are attached verbatim.
    #[must_use]
    pub fn from_fragment(name: String, fragment: &SchemaFragment, required: bool) -> Self {
        Self {
            name,
            kind: FieldKind::from_declared(fragment.schema_type.as_ref()),
            description: fragment.description.clone(),
            required,
        }
    }

    /// JSON-Schema property for the MCP input schema.
    #[must_use]
    pub fn property_schema(&self) -> Value {
        let mut prop = json!({ "type": self.kind.as_str() });
        match self.kind {
            // Unconstrained element type.
            FieldKind::Array => prop["items"] = json!({}),
            // Empty-shape object.
            FieldKind::Object => prop["properties"] = json!({}),
            _ => {}
        }
        if let Some(desc) = &self.description {
            prop["description"] = json!(desc);
        }
        prop
    }
}

/// Build the MCP input schema for an ordered field set.
#[must_use]
pub fn build_input_schema(fields: &[FieldDescriptor]) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for field in fields {
        properties.insert(field.name.clone(), field.property_schema());
        if field.required {
            required.push(field.name.clone());
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }

    schema
}

/// Validate a caller-supplied argument map against an ordered field set.
///
/// Returns the Invocation Context: the accepted arguments in field-set order.
/// Required fields must be present and non-null, every value must inhabit its
/// declared kind, and unknown argument names are rejected.
///
/// # Errors
///
/// Returns [`AdapterError::InvalidArguments`] on any violation.
pub fn validate_arguments(
    fields: &[FieldDescriptor],
    arguments: &Map<String, Value>,
) -> Result<Vec<(String, Value)>> {
    for name in arguments.keys() {
        if !fields.iter().any(|f| f.name == *name) {
            return Err(AdapterError::InvalidArguments(format!(
                "unknown argument '{name}'"
            )));
        }
    }

    let mut accepted = Vec::with_capacity(fields.len());
    for field in fields {
        let value = match arguments.get(&field.name) {
            Some(Value::Null) | None => {
                if field.required {
                    return Err(AdapterError::InvalidArguments(format!(
                        "missing required argument '{}'",
                        field.name
                    )));
                }
                continue;
            }
            Some(value) => value,
        };

        if !field.kind.admits(value) {
            return Err(AdapterError::InvalidArguments(format!(
                "argument '{}' must be a {}",
                field.name,
                field.kind.as_str()
            )));
        }
        accepted.push((field.name.clone(), value.clone()));
    }

    Ok(accepted)
}
