//! Backend client: one pooled `reqwest::Client` plus the injected
//! [`ServiceConfig`], owning endpoint construction, headers, the request
//! timeout, and the mapping from HTTP failures to [`ToolError`].
//!
//! The client is deliberately dumb: no retries, no response-shape
//! validation. A 2xx with a JSON body is returned verbatim; everything else
//! becomes one of the backend-family error variants.

use crate::config::ServiceConfig;
use crate::error::ToolError;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Path of the structured-extraction endpoint, relative to the base URL.
pub const EXTRACT_PATH: &str = "/parser/document-extract";

/// Path of the classification endpoint, relative to the base URL.
pub const CLASSIFY_PATH: &str = "/parser/document-classify";

/// HTTP client for the document-processing backend.
///
/// Construct once at startup and share via `Arc`; the underlying
/// `reqwest::Client` pools connections across calls.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl BackendClient {
    /// Build a client from the given configuration.
    ///
    /// The request timeout is fixed here for the client's lifetime; expiry
    /// surfaces as [`ToolError::BackendTransport`] like any other transport
    /// failure.
    pub fn new(config: ServiceConfig) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ToolError::BackendTransport {
                reason: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Full URL of the extraction endpoint.
    pub fn extraction_url(&self) -> String {
        format!("{}{}", self.config.base_url, EXTRACT_PATH)
    }

    /// Full URL of the classification endpoint.
    pub fn classification_url(&self) -> String {
        format!("{}{}", self.config.base_url, CLASSIFY_PATH)
    }

    /// POST a JSON payload and decode the JSON response.
    ///
    /// Headers: `accept: application/json`, `x-api-key` when a key is
    /// configured (a missing key is not validated locally; the backend
    /// reports it), and `Content-Type: application/json` from the JSON body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<Value, ToolError> {
        debug!("POST {}", url);

        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            warn!("backend request to {} failed: {}", url, e);
            ToolError::BackendTransport {
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("backend returned {} for {}", status, url);
            return Err(ToolError::BackendStatus {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                ToolError::BackendDecode {
                    reason: e.to_string(),
                }
            } else {
                ToolError::BackendTransport {
                    reason: e.to_string(),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_cleanly() {
        let config = ServiceConfig::builder()
            .base_url("https://backend.example.com/")
            .build()
            .unwrap();
        let client = BackendClient::new(config).unwrap();
        assert_eq!(
            client.extraction_url(),
            "https://backend.example.com/parser/document-extract"
        );
        assert_eq!(
            client.classification_url(),
            "https://backend.example.com/parser/document-classify"
        );
    }

    #[test]
    fn default_config_points_at_production() {
        let client = BackendClient::new(ServiceConfig::default()).unwrap();
        assert!(client.extraction_url().starts_with("https://"));
        assert!(client.extraction_url().ends_with(EXTRACT_PATH));
    }
}
