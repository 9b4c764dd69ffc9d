//! MCP stdio server
//!
//! Reads newline-delimited JSON-RPC from the client and answers on the
//! writer. `initialize`, `ping` and `tools/list` are answered inline by the
//! read loop. Each `tools/call` runs on its own task so one slow command
//! never holds up other requests; responses may therefore arrive out of
//! order and are matched by `id`.
//!
//! ```text
//! stdin ──▶ read loop ──┬──▶ inline reply ───────────────┐
//!                       └──▶ spawn(call_tool) ─▶ dispatch ┴─▶ Mutex<writer> ──▶ stdout
//! ```

use super::protocol::{
    CallToolParams, CallToolResult, DEFAULT_PROTOCOL_VERSION, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, IncomingMessage, InitializeParams, InitializeResult, ListToolsResult,
    METHOD_NOT_FOUND, OutgoingResponse, PARSE_ERROR, SERVER_NAME, ServerInfo,
};
use kubegate_application::{DispatchToolUseCase, ListToolsUseCase};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Transport failure that ends the server loop
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error on protocol stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

type SharedWriter<W> = Arc<Mutex<BufWriter<W>>>;

/// What the read loop does with one line.
enum Routed {
    Reply(OutgoingResponse),
    Call { id: Value, params: CallToolParams },
    Ignore,
}

pub struct McpServer {
    dispatcher: Arc<DispatchToolUseCase>,
    listing: Arc<ListToolsUseCase>,
    version: String,
}

impl McpServer {
    pub fn new(dispatcher: Arc<DispatchToolUseCase>, listing: Arc<ListToolsUseCase>) -> Self {
        Self {
            dispatcher,
            listing,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serve on the process's stdin / stdout.
    pub async fn serve_stdio(
        self: Arc<Self>,
        cancel: CancellationToken,
    ) -> Result<(), ServerError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout(), cancel).await
    }

    /// Serve until the reader reaches EOF or `cancel` fires.
    ///
    /// On EOF in-flight calls are allowed to finish and answer. On cancel
    /// the dispatcher is shut down and in-flight calls are aborted, which
    /// kills their child processes.
    pub async fn serve<R, W>(
        self: Arc<Self>,
        reader: R,
        writer: W,
        cancel: CancellationToken,
    ) -> Result<(), ServerError>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer: SharedWriter<W> = Arc::new(Mutex::new(BufWriter::new(writer)));
        let mut lines = BufReader::new(reader).lines();
        let mut calls = JoinSet::new();

        info!("MCP server listening on stdio");

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, stopping server loop");
                    break;
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                debug!("Client closed input");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match self.route(&line) {
                Routed::Reply(response) => write_response(&writer, &response).await?,
                Routed::Call { id, params } => {
                    let server = Arc::clone(&self);
                    let writer = Arc::clone(&writer);
                    calls.spawn(async move {
                        let response = server.call_tool(id, params).await;
                        if let Err(e) = write_response(&writer, &response).await {
                            warn!("Failed to write tools/call response: {}", e);
                        }
                    });
                }
                Routed::Ignore => {}
            }

            while let Some(finished) = calls.try_join_next() {
                if let Err(e) = finished {
                    warn!("tools/call task failed: {}", e);
                }
            }
        }

        if cancel.is_cancelled() {
            self.dispatcher.shutdown();
            calls.abort_all();
        }
        while let Some(finished) = calls.join_next().await {
            if let Err(e) = finished {
                if !e.is_cancelled() {
                    warn!("tools/call task failed: {}", e);
                }
            }
        }

        Ok(())
    }

    fn route(&self, line: &str) -> Routed {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparsable message: {}", e);
                return Routed::Reply(OutgoingResponse::failure(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let message: IncomingMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(e) => {
                return Routed::Reply(OutgoingResponse::failure(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        let Some(id) = message.id else {
            debug!(method = %message.method, "Notification received");
            return Routed::Ignore;
        };

        debug!(method = %message.method, id = %id, "Request received");
        match message.method.as_str() {
            "initialize" => {
                let params: InitializeParams = message
                    .params
                    .and_then(|p| serde_json::from_value(p).ok())
                    .unwrap_or_default();
                Routed::Reply(reply(id, &self.initialize_result(params)))
            }
            "ping" => Routed::Reply(OutgoingResponse::success(
                id,
                Value::Object(Default::default()),
            )),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.listing.describe_all(),
                };
                Routed::Reply(reply(id, &result))
            }
            "tools/call" => {
                let params = message.params.unwrap_or(Value::Null);
                match serde_json::from_value::<CallToolParams>(params) {
                    Ok(params) => Routed::Call { id, params },
                    Err(e) => Routed::Reply(OutgoingResponse::failure(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    )),
                }
            }
            other => Routed::Reply(OutgoingResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        }
    }

    fn initialize_result(&self, params: InitializeParams) -> InitializeResult {
        InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: serde_json::json!({ "tools": {} }),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: self.version.clone(),
            },
        }
    }

    async fn call_tool(&self, id: Value, params: CallToolParams) -> OutgoingResponse {
        let result = self.dispatcher.dispatch(&params.name, &params.arguments).await;
        reply(id, &CallToolResult::from(result))
    }
}

fn reply<T: Serialize>(id: Value, result: &T) -> OutgoingResponse {
    match serde_json::to_value(result) {
        Ok(value) => OutgoingResponse::success(id, value),
        Err(e) => OutgoingResponse::failure(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
    }
}

async fn write_response<W>(
    writer: &SharedWriter<W>,
    response: &OutgoingResponse,
) -> Result<(), ServerError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(response)?;
    line.push('\n');

    let mut w = writer.lock().await;
    w.write_all(line.as_bytes()).await?;
    w.flush().await?;
    Ok(())
}
