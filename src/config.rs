//! Configuration for the Aucterra tool service.
//!
//! Every knob lives in [`ServiceConfig`], built via its
//! [`ServiceConfigBuilder`] or read once at startup with
//! [`ServiceConfig::from_env`]. The API key is carried here and injected
//! into [`crate::backend::BackendClient`] at construction time; request
//! paths never touch the process environment.

use crate::error::ToolError;
use std::fmt;

/// Environment variable holding the backend API key.
pub const API_KEY_ENV: &str = "AUCTERRA_API_KEY";

/// Production backend deployment.
pub const DEFAULT_BASE_URL: &str =
    "https://5gn4u7v34c2pabqoqudprz4szq0ygrdt.lambda-url.us-east-1.on.aws";

/// Configuration for tool invocations and input resolution.
///
/// # Example
/// ```rust
/// use aucterra_mcp::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .api_key("sk-test")
///     .request_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ServiceConfig {
    /// Backend API key sent as the `x-api-key` header. `None` is allowed:
    /// the backend rejects unauthenticated calls itself and the failure
    /// surfaces as an ordinary error string.
    pub api_key: Option<String>,

    /// Base URL of the backend deployment. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Per-backend-call timeout in seconds. Default: 60.
    ///
    /// Expiry is reported through the same error-string path as any other
    /// transport failure.
    pub request_timeout_secs: u64,

    /// Timeout for fetching URL inputs in seconds. Default: 120.
    ///
    /// Separate from `request_timeout_secs`: input downloads may be large
    /// documents on slow origins.
    pub download_timeout_secs: u64,

    /// Cap on file and download sizes in bytes. Default: 20 MB.
    ///
    /// Inputs are buffered whole before base64 encoding; the cap bounds that
    /// buffer. Oversized inputs fail as input errors.
    pub max_input_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 60,
            download_timeout_secs: 120,
            max_input_bytes: 20 * 1024 * 1024,
        }
    }
}

// The API key never appears in logs; Debug prints only whether one is set.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default configuration with the API key read from [`API_KEY_ENV`].
    ///
    /// An unset or empty variable leaves `api_key` as `None`; the backend
    /// reports the missing credential when first called.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        // Endpoint paths are joined with '/', so strip a trailing one here.
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn max_input_bytes(mut self, bytes: usize) -> Self {
        self.config.max_input_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, ToolError> {
        let c = &self.config;
        if c.base_url.is_empty() || !c.base_url.starts_with("http") {
            return Err(ToolError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                c.base_url
            )));
        }
        if c.request_timeout_secs == 0 || c.download_timeout_secs == 0 {
            return Err(ToolError::InvalidConfig(
                "timeouts must be ≥ 1 second".into(),
            ));
        }
        if c.max_input_bytes == 0 {
            return Err(ToolError::InvalidConfig(
                "max_input_bytes must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
