//! Error types for the aucterra-mcp library.
//!
//! One enum, two families, split by where the failure is rendered at the
//! tool boundary:
//!
//! * **Input-error family**: `input_data` could not be turned into a
//!   canonical base64 payload (unrecognised form, unreadable file, oversized
//!   content, failed download). Rendered as `"Invalid input_data: …"`.
//!
//! * **Backend family**: the payload was fine but the backend call failed
//!   (transport error, timeout, non-2xx, undecodable body). Rendered as
//!   `"Extraction failed: …"` / `"Classification failed: …"`.
//!
//! [`ToolError::is_input_error`] is the partition the adaptation layer in
//! [`crate::tools`] keys on. Nothing in this enum ever crosses the host
//! boundary as a raised error; the tool layer renders every variant to a
//! plain string result.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while resolving input or calling the backend.
#[derive(Debug, Error)]
pub enum ToolError {
    // ── Input-error family ────────────────────────────────────────────────
    /// The input string matches none of the recognised forms.
    ///
    /// The message text is part of the tool contract; hosts display it
    /// verbatim after the `"Invalid input_data: "` label.
    #[error("must be a local path, base64 string, or a valid URL.")]
    InvalidInput,

    /// A file or downloaded body exceeded the configured size cap.
    #[error("input exceeds the {limit}-byte limit")]
    InputTooLarge { limit: usize },

    /// The path exists but its contents could not be read.
    #[error("could not read '{path}': {reason}")]
    UnreadableFile { path: PathBuf, reason: String },

    /// HTTP(S) input was syntactically valid but the fetch failed
    /// (network error or non-2xx status).
    #[error("failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The URL fetch exceeded the configured download timeout.
    #[error("download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Backend family ────────────────────────────────────────────────────
    /// Connection failure or request timeout talking to the backend.
    #[error("backend request failed: {reason}")]
    BackendTransport { reason: String },

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}")]
    BackendStatus { status: u16 },

    /// The backend body was not valid JSON.
    #[error("backend response is not valid JSON: {reason}")]
    BackendDecode { reason: String },

    // ── Protocol / startup errors ─────────────────────────────────────────
    /// Tool arguments failed shape validation. Surfaced to the host as a
    /// JSON-RPC invalid-params error, never as a tool result string.
    #[error("invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ToolError {
    /// True for the variants rendered with the `"Invalid input_data:"` label.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidInput
                | ToolError::InputTooLarge { .. }
                | ToolError::UnreadableFile { .. }
                | ToolError::DownloadFailed { .. }
                | ToolError::DownloadTimeout { .. }
        )
    }
}
