//! Structured-data extraction tool.
//!
//! Resolves `input_data`, assembles the extraction payload, and POSTs it to
//! the backend. The payload always carries `advanced_ocr: "disable"`; the
//! backend's advanced OCR path is not exposed through this tool.

use crate::backend::BackendClient;
use crate::error::ToolError;
use crate::resolver::{self, ResolvedDocument};
use crate::tools::{render_failure, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Extraction strategy, serialised lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionType {
    #[default]
    Generic,
    Specific,
}

/// Arguments accepted by `document_extraction_tool`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionArgs {
    /// Local file path, base64-encoded document, or http(s) URL.
    pub input_data: String,
    /// Field definitions to extract. Opaque to this layer: objects are
    /// passed through to the backend without inspection.
    pub fields: Vec<Value>,
    #[serde(default = "default_document_id")]
    pub document_id: String,
    #[serde(default)]
    pub extraction_type: ExtractionType,
}

pub(crate) fn default_document_id() -> String {
    "123".to_string()
}

impl ExtractionArgs {
    /// Parse the host-supplied arguments object.
    pub fn parse(value: Value) -> Result<Self, ToolError> {
        serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments {
            reason: e.to_string(),
        })
    }
}

/// Assemble the wire payload from resolved input and pass-through fields.
fn build_payload(args: &ExtractionArgs, document: &ResolvedDocument) -> Value {
    json!({
        "input_data": document.as_str(),
        "fields": args.fields,
        "document_id": args.document_id,
        "extraction_type": args.extraction_type,
        "advanced_ocr": "disable",
    })
}

/// Run an extraction, returning the structured error on failure.
///
/// Internal callers and tests use this; hosts go through [`invoke`].
pub async fn run(client: &BackendClient, args: &ExtractionArgs) -> Result<Value, ToolError> {
    let document = resolver::resolve(&args.input_data, client.config()).await?;
    let payload = build_payload(args, &document);
    debug!(
        "extraction request: document_id={}, {} fields",
        args.document_id,
        args.fields.len()
    );
    client.post(&client.extraction_url(), &payload).await
}

/// Invoke the extraction tool, rendering every failure to the host string
/// contract. Never returns an error.
pub async fn invoke(client: &BackendClient, args: &ExtractionArgs) -> ToolResult {
    match run(client, args).await {
        Ok(body) => ToolResult::Success(body),
        Err(err) => ToolResult::Error(render_failure("Extraction", &err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::resolver::resolve;

    fn minimal_args(input_data: &str) -> ExtractionArgs {
        ExtractionArgs::parse(json!({
            "input_data": input_data,
            "fields": [{"name": "invoice_total"}],
        }))
        .unwrap()
    }

    #[test]
    fn parse_applies_defaults() {
        let args = minimal_args("JVBERjEuNAo=");
        assert_eq!(args.document_id, "123");
        assert_eq!(args.extraction_type, ExtractionType::Generic);
    }

    #[test]
    fn parse_rejects_missing_fields() {
        let err = ExtractionArgs::parse(json!({"input_data": "JVBERjEuNAo="})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let err = ExtractionArgs::parse(json!({
            "input_data": "JVBERjEuNAo=",
            "fields": [],
            "advanced_ocr": "enable",
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn payload_carries_fixed_and_default_values() {
        let args = ExtractionArgs::parse(json!({
            "input_data": "JVBERjEuNAo=",
            "fields": [{"name": "invoice_total"}],
            "document_id": "abc",
        }))
        .unwrap();
        let document = resolve(&args.input_data, &ServiceConfig::default())
            .await
            .unwrap();

        let payload = build_payload(&args, &document);
        assert_eq!(payload["input_data"], "JVBERjEuNAo=");
        assert_eq!(payload["fields"], json!([{"name": "invoice_total"}]));
        assert_eq!(payload["document_id"], "abc");
        assert_eq!(payload["extraction_type"], "generic");
        assert_eq!(payload["advanced_ocr"], "disable");
    }

    #[test]
    fn extraction_type_serialises_lowercase() {
        assert_eq!(json!(ExtractionType::Generic), json!("generic"));
        assert_eq!(json!(ExtractionType::Specific), json!("specific"));
    }

    #[tokio::test]
    async fn invoke_renders_invalid_input() {
        let client = BackendClient::new(ServiceConfig::default()).unwrap();
        let args = minimal_args("not-a-path-or-b64-or-url");

        let result = invoke(&client, &args).await;
        assert_eq!(
            result,
            ToolResult::Error(
                "Invalid input_data: must be a local path, base64 string, or a valid URL."
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn invoke_renders_backend_failure_with_label() {
        // Nothing listens on the discard port; the call fails at connect.
        let config = ServiceConfig::builder()
            .base_url("http://127.0.0.1:9")
            .request_timeout_secs(2)
            .build()
            .unwrap();
        let client = BackendClient::new(config).unwrap();
        let args = minimal_args("JVBERjEuNAo=");

        let result = invoke(&client, &args).await;
        match result {
            ToolResult::Error(message) => {
                assert!(
                    message.starts_with("Extraction failed: "),
                    "unexpected message: {message}"
                );
            }
            ToolResult::Success(_) => panic!("expected an error result"),
        }
    }
}
