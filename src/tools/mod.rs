//! The two tools exposed to the host runtime, and the boundary contract
//! they share.
//!
//! Each tool module follows the same shape: a serde argument struct with
//! the declared defaults, a `run()` returning the internal
//! `Result<Value, ToolError>`, and an `invoke()` wrapper that renders every
//! failure to the host-required string form. `invoke()` never returns
//! `Err`: the host protocol expects tool calls to succeed at the transport
//! level and encode failure in the payload.

pub mod classify;
pub mod extract;

use crate::error::ToolError;
use serde::Serialize;
use serde_json::{json, Value};

/// Name of the extraction tool as advertised to hosts.
pub const EXTRACTION_TOOL: &str = "document_extraction_tool";

/// Name of the classification tool as advertised to hosts.
pub const CLASSIFICATION_TOOL: &str = "document_classification_tool";

/// Outcome of a tool invocation.
///
/// Success carries the backend's JSON body verbatim; failure carries a
/// short descriptive sentence. No structured error crosses this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Error(String),
}

impl ToolResult {
    /// The text a host renders for this result: compact JSON on success,
    /// the error sentence on failure.
    pub fn render_text(&self) -> String {
        match self {
            ToolResult::Success(value) => value.to_string(),
            ToolResult::Error(message) => message.clone(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error(_))
    }
}

/// Render a tool failure with the label the host contract fixes:
/// input errors as `"Invalid input_data: …"`, everything else as
/// `"<label> failed: …"`.
pub(crate) fn render_failure(label: &str, err: &ToolError) -> String {
    if err.is_input_error() {
        format!("Invalid input_data: {err}")
    } else {
        format!("{label} failed: {err}")
    }
}

/// A tool as advertised through `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Definitions for the two document tools.
///
/// The descriptions are discovery text for the host's model; behaviour is
/// fixed by the argument schemas and the invokers.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            EXTRACTION_TOOL,
            "Extract structured data from documents. Supports nested fields.",
            json!({
                "type": "object",
                "properties": {
                    "input_data": {
                        "type": "string",
                        "description": "Local file path, base64-encoded document, or http(s) URL"
                    },
                    "fields": {
                        "type": "array",
                        "items": { "type": "object" },
                        "description": "Field definitions to extract; objects may be arbitrarily nested"
                    },
                    "document_id": {
                        "type": "string",
                        "default": "123",
                        "description": "Caller-chosen identifier echoed in the result"
                    },
                    "extraction_type": {
                        "type": "string",
                        "enum": ["generic", "specific"],
                        "default": "generic",
                        "description": "Extraction strategy"
                    }
                },
                "required": ["input_data", "fields"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            CLASSIFICATION_TOOL,
            "Classify document into a predefined class.",
            json!({
                "type": "object",
                "properties": {
                    "input_data": {
                        "type": "string",
                        "description": "Local file path, base64-encoded document, or http(s) URL"
                    },
                    "classes": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Candidate classes to choose from"
                    },
                    "document_id": {
                        "type": "string",
                        "default": "123",
                        "description": "Caller-chosen identifier echoed in the result"
                    }
                },
                "required": ["input_data", "classes"],
                "additionalProperties": false
            }),
        ),
    ]
}
