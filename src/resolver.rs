//! Input resolution: normalise a user-supplied path, base64 payload, or URL
//! into the canonical base64 string the backend expects.
//!
//! Classification runs as an ordered chain (path existence, then a strict
//! base64 round-trip, then the URL prefix) and the first matching form
//! wins. The order is part of the contract: an ambiguous string (a short
//! name that is both an existing relative file and a valid base64 token)
//! resolves to whichever check runs first, so [`classify`] is exposed
//! separately and locked down by tests.

use crate::config::ServiceConfig;
use crate::error::ToolError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// The recognised forms of `input_data`, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    /// An existing filesystem entry; contents are read and encoded.
    LocalPath(PathBuf),
    /// Already-canonical base64; passed through unchanged.
    Base64Payload(String),
    /// An `http://` or `https://` URL; the body is fetched and encoded.
    RemoteUrl(String),
}

/// A canonical base64-encoded document, ready for payload assembly.
///
/// Never persisted; its lifetime is a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument(String);

impl ResolvedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Classify an input string into one of the recognised forms.
///
/// Returns `None` when no form matches; [`resolve`] turns that into the
/// fixed invalid-input error. Purely local except for the path-existence
/// probe; no content is read here.
pub fn classify(input: &str) -> Option<DocumentInput> {
    let path = Path::new(input);
    if path.exists() {
        return Some(DocumentInput::LocalPath(path.to_path_buf()));
    }

    if is_canonical_base64(input) {
        return Some(DocumentInput::Base64Payload(input.to_string()));
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return Some(DocumentInput::RemoteUrl(input.to_string()));
    }

    None
}

/// Strict round-trip test: decode, re-encode, compare.
///
/// Rejects base64 with non-canonical padding or embedded whitespace, not
/// just malformed input: only strings identical to their own re-encoding
/// pass through unchanged.
pub fn is_canonical_base64(input: &str) -> bool {
    match STANDARD.decode(input) {
        Ok(bytes) => STANDARD.encode(&bytes) == input,
        Err(_) => false,
    }
}

/// Resolve `input_data` to a canonical base64 document.
///
/// Ordered checks, first match wins:
/// 1. existing path → read (size-capped) and encode
/// 2. canonical base64 → pass through
/// 3. `http(s)://` → fetch (timeout- and size-bounded) and encode
///
/// Anything else fails with [`ToolError::InvalidInput`]. All failures here
/// belong to the input-error family rendered as `"Invalid input_data: …"`
/// at the tool boundary.
pub async fn resolve(input: &str, config: &ServiceConfig) -> Result<ResolvedDocument, ToolError> {
    match classify(input) {
        Some(DocumentInput::LocalPath(path)) => read_local(&path, config.max_input_bytes),
        Some(DocumentInput::Base64Payload(b64)) => {
            debug!("input_data is canonical base64 ({} chars), passing through", b64.len());
            Ok(ResolvedDocument(b64))
        }
        Some(DocumentInput::RemoteUrl(url)) => fetch_remote(&url, config).await,
        None => Err(ToolError::InvalidInput),
    }
}

/// Read a local file whole and base64-encode it.
///
/// The read is synchronous and blocks the running task for its duration;
/// `max_bytes` bounds the buffer.
fn read_local(path: &Path, max_bytes: usize) -> Result<ResolvedDocument, ToolError> {
    let metadata = std::fs::metadata(path).map_err(|e| ToolError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if metadata.len() > max_bytes as u64 {
        return Err(ToolError::InputTooLarge { limit: max_bytes });
    }

    let bytes = std::fs::read(path).map_err(|e| ToolError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!("read local file {} ({} bytes)", path.display(), bytes.len());
    Ok(ResolvedDocument(STANDARD.encode(&bytes)))
}

/// Fetch a URL and base64-encode the response body.
async fn fetch_remote(url: &str, config: &ServiceConfig) -> Result<ResolvedDocument, ToolError> {
    info!("downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .build()
        .map_err(|e| ToolError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ToolError::DownloadTimeout {
                url: url.to_string(),
                secs: config.download_timeout_secs,
            }
        } else {
            ToolError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ToolError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    if let Some(len) = response.content_length() {
        if len > config.max_input_bytes as u64 {
            return Err(ToolError::InputTooLarge {
                limit: config.max_input_bytes,
            });
        }
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ToolError::DownloadTimeout {
                url: url.to_string(),
                secs: config.download_timeout_secs,
            }
        } else {
            ToolError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    // Content-Length is optional; re-check the actual body size.
    if bytes.len() > config.max_input_bytes {
        return Err(ToolError::InputTooLarge {
            limit: config.max_input_bytes,
        });
    }

    info!("downloaded {} bytes from {}", bytes.len(), url);
    Ok(ResolvedDocument(STANDARD.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_config() -> ServiceConfig {
        ServiceConfig::default()
    }

    #[test]
    fn classify_existing_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let s = file.path().to_str().unwrap();
        assert!(matches!(classify(s), Some(DocumentInput::LocalPath(_))));
    }

    #[test]
    fn classify_canonical_base64() {
        assert_eq!(
            classify("JVBERjEuNAo="),
            Some(DocumentInput::Base64Payload("JVBERjEuNAo=".into()))
        );
    }

    #[test]
    fn classify_url() {
        assert_eq!(
            classify("https://example.com/doc.pdf"),
            Some(DocumentInput::RemoteUrl("https://example.com/doc.pdf".into()))
        );
        assert!(matches!(
            classify("http://example.com/doc.pdf"),
            Some(DocumentInput::RemoteUrl(_))
        ));
    }

    #[test]
    fn classify_unrecognised() {
        assert_eq!(classify("not-a-path-or-b64-or-url"), None);
        assert_eq!(classify("ftp://example.com/doc.pdf"), None);
    }

    #[test]
    fn path_check_precedes_base64() {
        // "/tmp" is simultaneously an existing path and canonical base64
        // (four characters of the standard alphabet). Precedence sends it
        // down the path branch.
        assert!(is_canonical_base64("/tmp"));
        assert!(matches!(classify("/tmp"), Some(DocumentInput::LocalPath(_))));
    }

    #[test]
    fn strict_round_trip_rejects_non_canonical() {
        // Missing padding
        assert!(!is_canonical_base64("JVBERjEuNAo"));
        // Embedded whitespace
        assert!(!is_canonical_base64("JVBERjEu NAo="));
        assert!(!is_canonical_base64("JVBERjEuNAo=\n"));
        // Plainly malformed
        assert!(!is_canonical_base64("not-base-64!"));
    }

    #[test]
    fn empty_string_is_canonical_base64() {
        // "" decodes to zero bytes and re-encodes to "": the round-trip rule
        // classifies it as an (empty) base64 payload, and the backend is the
        // one to reject it.
        assert!(is_canonical_base64(""));
        assert_eq!(classify(""), Some(DocumentInput::Base64Payload(String::new())));
    }

    #[tokio::test]
    async fn resolve_encodes_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4\n").unwrap();
        file.flush().unwrap();

        let resolved = resolve(file.path().to_str().unwrap(), &test_config())
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "JVBERi0xLjQK");
    }

    #[tokio::test]
    async fn resolve_passes_base64_through() {
        let resolved = resolve("JVBERjEuNAo=", &test_config()).await.unwrap();
        assert_eq!(resolved.as_str(), "JVBERjEuNAo=");
    }

    #[tokio::test]
    async fn resolve_is_idempotent_for_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"stable contents").unwrap();
        file.flush().unwrap();
        let s = file.path().to_str().unwrap();

        let first = resolve(s, &test_config()).await.unwrap();
        let second = resolve(s, &test_config()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn resolve_rejects_unrecognised_input() {
        let err = resolve("not-a-path-or-b64-or-url", &test_config())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput));
        assert_eq!(
            err.to_string(),
            "must be a local path, base64 string, or a valid URL."
        );
    }

    #[tokio::test]
    async fn resolve_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 64]).unwrap();
        file.flush().unwrap();

        let config = ServiceConfig::builder().max_input_bytes(16).build().unwrap();
        let err = resolve(file.path().to_str().unwrap(), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InputTooLarge { limit: 16 }));
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn resolve_reports_unreadable_entries() {
        // A directory passes the existence probe but cannot be read.
        let dir = tempfile::tempdir().unwrap();
        let err = resolve(dir.path().to_str().unwrap(), &test_config())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnreadableFile { .. }));
        assert!(err.is_input_error());
    }
}
