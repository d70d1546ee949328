//! MCP server: newline-delimited JSON-RPC 2.0 over stdio.
//!
//! The read loop parses one request per line and answers lifecycle methods
//! (`initialize`, `tools/list`, `shutdown`) inline. Each `tools/call` is
//! dispatched on its own spawned task, so slow backend calls never block
//! the loop and concurrent invocations interleave at their await points.
//! All responses, inline and spawned alike, funnel through one mpsc
//! channel into a single stdout writer task, keeping the NDJSON framing
//! intact no matter which order calls complete in.
//!
//! Tool failures are not JSON-RPC errors: the call succeeds at the
//! protocol level and carries the rendered error string in its content,
//! flagged with `isError`. JSON-RPC errors are reserved for protocol
//! faults (parse errors, unknown methods, unknown tools, malformed
//! argument objects).

use crate::backend::BackendClient;
use crate::protocol::{error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use crate::tools::{self, ToolResult, CLASSIFICATION_TOOL, EXTRACTION_TOOL};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffered responses between request tasks and the stdout writer.
const RESPONSE_CHANNEL_CAPACITY: usize = 32;

/// The MCP server. Owns the backend client and the initialized flag;
/// everything else is per-request state.
pub struct McpServer {
    client: Arc<BackendClient>,
    initialized: bool,
}

impl McpServer {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client: Arc::new(client),
            initialized: false,
        }
    }

    /// Serve requests from stdin until EOF.
    ///
    /// stdout belongs exclusively to the protocol; all logging goes to
    /// stderr via `tracing`.
    pub async fn run_stdio(mut self) -> std::io::Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let (tx, rx) = mpsc::channel(RESPONSE_CHANNEL_CAPACITY);
        let writer = tokio::spawn(write_responses(rx));

        info!("{} {} listening on stdio", SERVER_NAME, SERVER_VERSION);

        let mut lines = stdin.lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.handle_line(trimmed, &tx).await;
        }

        info!("stdin closed, shutting down");
        drop(tx);
        let _ = writer.await;
        Ok(())
    }

    /// Parse and dispatch a single request line, sending any responses
    /// through `tx`.
    pub async fn handle_line(&mut self, line: &str, tx: &mpsc::Sender<JsonRpcResponse>) {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!("unparseable request: {}", e);
                send(
                    tx,
                    JsonRpcResponse::error(
                        None,
                        error_codes::PARSE_ERROR,
                        format!("Parse error: {e}"),
                    ),
                )
                .await;
                return;
            }
        };

        if request.jsonrpc != "2.0" {
            send(
                tx,
                JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_REQUEST,
                    "Invalid JSON-RPC version. Expected '2.0'.",
                ),
            )
            .await;
            return;
        }

        // Requests without an id are notifications: process nothing,
        // answer nothing.
        let Some(id) = request.id else {
            debug!("ignoring notification: {}", request.method);
            return;
        };

        self.dispatch(id, &request.method, request.params, tx).await;
    }

    async fn dispatch(
        &mut self,
        id: JsonRpcId,
        method: &str,
        params: Option<Value>,
        tx: &mpsc::Sender<JsonRpcResponse>,
    ) {
        match method {
            methods::INITIALIZE => {
                if self.initialized {
                    send(
                        tx,
                        JsonRpcResponse::error(
                            Some(id),
                            error_codes::INVALID_REQUEST,
                            "Server already initialized",
                        ),
                    )
                    .await;
                    return;
                }
                self.initialized = true;

                if let Some(client_info) = params.as_ref().and_then(|p| p.get("clientInfo")) {
                    info!(
                        "client connected: {} {}",
                        client_info.get("name").and_then(|v| v.as_str()).unwrap_or("?"),
                        client_info.get("version").and_then(|v| v.as_str()).unwrap_or("?"),
                    );
                }

                send(
                    tx,
                    JsonRpcResponse::success(
                        Some(id),
                        json!({
                            "protocolVersion": PROTOCOL_VERSION,
                            "serverInfo": {
                                "name": SERVER_NAME,
                                "version": SERVER_VERSION,
                            },
                            "capabilities": { "tools": {} },
                        }),
                    ),
                )
                .await;
            }
            _ if !self.initialized => {
                send(
                    tx,
                    JsonRpcResponse::error(
                        Some(id),
                        error_codes::INVALID_REQUEST,
                        "Server not initialized",
                    ),
                )
                .await;
            }
            methods::SHUTDOWN => {
                self.initialized = false;
                send(tx, JsonRpcResponse::success(Some(id), Value::Null)).await;
            }
            methods::TOOLS_LIST => {
                let definitions = tools::definitions();
                send(
                    tx,
                    JsonRpcResponse::success(Some(id), json!({ "tools": definitions })),
                )
                .await;
            }
            methods::TOOLS_CALL => self.handle_tool_call(id, params, tx).await,
            _ => {
                send(
                    tx,
                    JsonRpcResponse::error(
                        Some(id),
                        error_codes::METHOD_NOT_FOUND,
                        format!("Method not found: {method}"),
                    ),
                )
                .await;
            }
        }
    }

    /// Validate the call envelope, then spawn the invocation on its own
    /// task. Argument-shape failures are protocol errors; everything past
    /// this point is rendered into the tool's content result.
    async fn handle_tool_call(
        &self,
        id: JsonRpcId,
        params: Option<Value>,
        tx: &mpsc::Sender<JsonRpcResponse>,
    ) {
        let params = params.unwrap_or_else(|| json!({}));
        let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
            send(
                tx,
                JsonRpcResponse::error(Some(id), error_codes::INVALID_PARAMS, "Missing tool name"),
            )
            .await;
            return;
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        info!("tools/call {} (id={:?})", name, id);

        match name {
            EXTRACTION_TOOL => {
                let args = match tools::extract::ExtractionArgs::parse(arguments) {
                    Ok(args) => args,
                    Err(e) => {
                        send(
                            tx,
                            JsonRpcResponse::error(
                                Some(id),
                                error_codes::INVALID_PARAMS,
                                e.to_string(),
                            ),
                        )
                        .await;
                        return;
                    }
                };
                let client = Arc::clone(&self.client);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = tools::extract::invoke(&client, &args).await;
                    send(&tx, tool_response(id, result)).await;
                });
            }
            CLASSIFICATION_TOOL => {
                let args = match tools::classify::ClassificationArgs::parse(arguments) {
                    Ok(args) => args,
                    Err(e) => {
                        send(
                            tx,
                            JsonRpcResponse::error(
                                Some(id),
                                error_codes::INVALID_PARAMS,
                                e.to_string(),
                            ),
                        )
                        .await;
                        return;
                    }
                };
                let client = Arc::clone(&self.client);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = tools::classify::invoke(&client, &args).await;
                    send(&tx, tool_response(id, result)).await;
                });
            }
            other => {
                send(
                    tx,
                    JsonRpcResponse::error(
                        Some(id),
                        error_codes::TOOL_NOT_FOUND,
                        format!("Unknown tool: {other}"),
                    ),
                )
                .await;
            }
        }
    }
}

/// Wrap a tool result in the MCP content envelope.
fn tool_response(id: JsonRpcId, result: ToolResult) -> JsonRpcResponse {
    let is_error = result.is_error();
    JsonRpcResponse::success(
        Some(id),
        json!({
            "content": [{ "type": "text", "text": result.render_text() }],
            "isError": is_error,
        }),
    )
}

async fn send(tx: &mpsc::Sender<JsonRpcResponse>, response: JsonRpcResponse) {
    if tx.send(response).await.is_err() {
        error!("response channel closed, dropping response");
    }
}

/// Single writer for stdout: serialises responses in arrival order, one
/// per line.
async fn write_responses(mut rx: mpsc::Receiver<JsonRpcResponse>) {
    let mut stdout = tokio::io::stdout();
    while let Some(response) = rx.recv().await {
        let line = match serde_json::to_string(&response) {
            Ok(line) => line,
            Err(e) => {
                error!("failed to serialise response: {}", e);
                continue;
            }
        };
        if stdout.write_all(line.as_bytes()).await.is_err()
            || stdout.write_all(b"\n").await.is_err()
            || stdout.flush().await.is_err()
        {
            error!("stdout write failed, dropping response");
            return;
        }
    }
}
