//! # aucterra-mcp
//!
//! MCP server exposing the Aucterra document-processing API as two agent
//! tools: structured-data extraction and document classification.
//!
//! The crate does not itself extract or classify anything; it is a
//! normalisation-and-forwarding layer. The one real job is turning a
//! heterogeneous `input_data` string (local file path, raw base64 payload,
//! or remote URL) into the canonical base64 form the backend expects, then
//! forwarding the call under the error-reporting rules of the host
//! tool-invocation protocol: a tool call always returns a result, never
//! raises, and encodes failure as a short descriptive string.
//!
//! ## Pipeline Overview
//!
//! ```text
//! tools/call
//!  │
//!  ├─ 1. Parse     argument shape (protocol error on mismatch)
//!  ├─ 2. Resolve   path / base64 / URL → canonical base64
//!  ├─ 3. Assemble  payload + fixed fields (advanced_ocr: "disable")
//!  ├─ 4. Forward   POST to backend, 60 s timeout, no retries
//!  └─ 5. Adapt     JSON body verbatim, or "<label> failed: …" string
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aucterra_mcp::{BackendClient, McpServer, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read once from AUCTERRA_API_KEY
//!     let client = BackendClient::new(ServiceConfig::from_env())?;
//!     McpServer::new(client).run_stdio().await?;
//!     Ok(())
//! }
//! ```
//!
//! Tools can also be invoked directly, without the protocol layer:
//!
//! ```rust,no_run
//! use aucterra_mcp::{tools, BackendClient, ServiceConfig};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BackendClient::new(ServiceConfig::from_env())?;
//! let args = tools::extract::ExtractionArgs::parse(json!({
//!     "input_data": "invoice.pdf",
//!     "fields": [{"name": "invoice_total"}],
//! }))?;
//! let result = tools::extract::invoke(&client, &args).await;
//! println!("{}", result.render_text());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `aucterra-mcp` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod error;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod tools;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::BackendClient;
pub use config::{ServiceConfig, ServiceConfigBuilder, API_KEY_ENV, DEFAULT_BASE_URL};
pub use error::ToolError;
pub use resolver::{classify, resolve, DocumentInput, ResolvedDocument};
pub use server::McpServer;
pub use tools::{ToolDefinition, ToolResult};
