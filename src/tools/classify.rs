//! Document classification tool.
//!
//! Same shape as [`crate::tools::extract`], with a slimmer payload: the
//! classification endpoint takes the candidate classes and no OCR or
//! extraction-type switches.

use crate::backend::BackendClient;
use crate::error::ToolError;
use crate::resolver::{self, ResolvedDocument};
use crate::tools::extract::default_document_id;
use crate::tools::{render_failure, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Arguments accepted by `document_classification_tool`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationArgs {
    /// Local file path, base64-encoded document, or http(s) URL.
    pub input_data: String,
    /// Candidate classes, passed through in order.
    pub classes: Vec<String>,
    #[serde(default = "default_document_id")]
    pub document_id: String,
}

impl ClassificationArgs {
    /// Parse the host-supplied arguments object.
    pub fn parse(value: Value) -> Result<Self, ToolError> {
        serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments {
            reason: e.to_string(),
        })
    }
}

fn build_payload(args: &ClassificationArgs, document: &ResolvedDocument) -> Value {
    json!({
        "input_data": document.as_str(),
        "classes": args.classes,
        "document_id": args.document_id,
    })
}

/// Run a classification, returning the structured error on failure.
pub async fn run(client: &BackendClient, args: &ClassificationArgs) -> Result<Value, ToolError> {
    let document = resolver::resolve(&args.input_data, client.config()).await?;
    let payload = build_payload(args, &document);
    debug!(
        "classification request: document_id={}, {} classes",
        args.document_id,
        args.classes.len()
    );
    client.post(&client.classification_url(), &payload).await
}

/// Invoke the classification tool, rendering every failure to the host
/// string contract. Never returns an error.
pub async fn invoke(client: &BackendClient, args: &ClassificationArgs) -> ToolResult {
    match run(client, args).await {
        Ok(body) => ToolResult::Success(body),
        Err(err) => ToolResult::Error(render_failure("Classification", &err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::resolver::resolve;

    #[test]
    fn parse_applies_default_document_id() {
        let args = ClassificationArgs::parse(json!({
            "input_data": "JVBERjEuNAo=",
            "classes": ["invoice", "receipt"],
        }))
        .unwrap();
        assert_eq!(args.document_id, "123");
        assert_eq!(args.classes, vec!["invoice", "receipt"]);
    }

    #[test]
    fn parse_rejects_missing_classes() {
        let err = ClassificationArgs::parse(json!({"input_data": "JVBERjEuNAo="})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn payload_has_no_extraction_keys() {
        let args = ClassificationArgs::parse(json!({
            "input_data": "JVBERjEuNAo=",
            "classes": ["invoice", "receipt"],
        }))
        .unwrap();
        let document = resolve(&args.input_data, &ServiceConfig::default())
            .await
            .unwrap();

        let payload = build_payload(&args, &document);
        assert_eq!(payload["document_id"], "123");
        assert_eq!(payload["classes"], json!(["invoice", "receipt"]));
        assert!(payload.get("advanced_ocr").is_none());
        assert!(payload.get("extraction_type").is_none());
    }

    #[tokio::test]
    async fn invoke_renders_invalid_input() {
        let client = BackendClient::new(ServiceConfig::default()).unwrap();
        let args = ClassificationArgs::parse(json!({
            "input_data": "not-a-path-or-b64-or-url",
            "classes": ["invoice"],
        }))
        .unwrap();

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
        let config = ServiceConfig::builder()
            .base_url("http://127.0.0.1:9")
            .request_timeout_secs(2)
            .build()
            .unwrap();
        let client = BackendClient::new(config).unwrap();
        let args = ClassificationArgs::parse(json!({
            "input_data": "JVBERjEuNAo=",
            "classes": ["invoice"],
        }))
        .unwrap();

        let result = invoke(&client, &args).await;
        match result {
            ToolResult::Error(message) => {
                assert!(
                    message.starts_with("Classification failed: "),
                    "unexpected message: {message}"
                );
            }
            ToolResult::Success(_) => panic!("expected an error result"),
        }
    }
}
