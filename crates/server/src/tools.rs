//! The hand-declared sandbox tool table.
//!
//! One declarative table covers the known sandbox API; the descriptors it
//! generates dispatch through the same path as dynamically derived tools.

use sandbox_openapi_tools::Method;
use sandbox_openapi_tools::derive::ToolDescriptor;
use sandbox_openapi_tools::schema::{FieldDescriptor, FieldKind};

struct StaticField {
    name: &'static str,
    description: &'static str,
    required: bool,
}

struct StaticTool {
    name: &'static str,
    description: &'static str,
    path: &'static str,
    fields: &'static [StaticField],
}

const SANDBOX_TOOLS: &[StaticTool] = &[
    StaticTool {
        name: "sandbox_write_file",
        description: "Create a new file or overwrite an existing file in a python+nodejs code linux sandbox, auto create new sandbox if sandbox_id is undefined",
        path: "/api/tools/write_file",
        fields: &[
            StaticField {
                name: "path",
                description: "The relative path of the file to write to, relative to the linux home directory, (e.g. 'src/main.py' or 'package.json')",
                required: true,
            },
            StaticField {
                name: "content",
                description: "The content to write to the file",
                required: true,
            },
            StaticField {
                name: "sandbox_id",
                description: "The sandbox id of an existing sandbox to write the file to, will create new if undefined",
                required: false,
            },
        ],
    },
    StaticTool {
        name: "sandbox_read_file",
        description: "Read the content of a file from an existing python+nodejs code sandbox linux debian VM",
        path: "/api/tools/read_file",
        fields: &[
            StaticField {
                name: "path",
                description: "The relative path of the file to read, relative to the linux sandbox home directory",
                required: true,
            },
            StaticField {
                name: "sandbox_id",
                description: "The sandbox id of an existing sandbox to read from",
                required: true,
            },
        ],
    },
    StaticTool {
        name: "sandbox_list_directory",
        description: "List all direct children in a directory in an existing code sandbox, non recursive, linux debian VM",
        path: "/api/tools/list_directory",
        fields: &[
            StaticField {
                name: "path",
                description: "The relative path of the directory to list, relative to the linux sandbox home directory",
                required: true,
            },
            StaticField {
                name: "sandbox_id",
                description: "The sandbox id of an existing sandbox to list the directory from",
                required: true,
            },
        ],
    },
    StaticTool {
        name: "sandbox_execute_command",
        description: "Execute a command in an existing nodejs+python code sandbox in a Linux debian VM",
        path: "/api/tools/execute_command",
        fields: &[
            StaticField {
                name: "command",
                description: "The command to execute",
                required: true,
            },
            StaticField {
                name: "sandbox_id",
                description: "The sandbox id of an existing sandbox to execute the command in",
                required: true,
            },
        ],
    },
];

/// Materialize the table. Every sandbox operation is a POST with string
/// fields.
pub fn sandbox_tools() -> Vec<ToolDescriptor> {
    SANDBOX_TOOLS
        .iter()
        .map(|tool| ToolDescriptor {
            name: tool.name.to_string(),
            description: tool.description.to_string(),
            fields: tool
                .fields
                .iter()
                .map(|field| FieldDescriptor {
                    name: field.name.to_string(),
                    kind: FieldKind::String,
                    description: Some(field.description.to_string()),
                    required: field.required,
                })
                .collect(),
            method: Method::POST,
            path: tool.path.to_string(),
        })
        .collect()
}
