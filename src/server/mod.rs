//! Line-delimited JSON-RPC server exposing the checklist tool over stdio.
//!
//! stdout carries protocol messages only; all logging goes to stderr and the
//! log file.

pub mod protocol;
pub mod tools;

use crate::error::ChecklistError;
use crate::llm::Completer;
use crate::persist::Persister;
use crate::response::ResponseShaper;
use crate::service::ChecklistService;
use protocol::{
    CallToolParams, Request, Response, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "checklist-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer<C, P> {
    service: ChecklistService<C, P>,
}

impl<C: Completer, P: Persister> McpServer<C, P> {
    pub fn new(service: ChecklistService<C, P>) -> Self {
        Self { service }
    }

    /// Serve until the reader reaches EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Checklist MCP Server running on stdio");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("Unparseable message: {}", err);
                return Some(Response::failure(Value::Null, PARSE_ERROR, "Parse error"));
            }
        };
        let request: Request = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(err) => {
                warn!("Invalid request: {}", err);
                return Some(Response::failure(Value::Null, INVALID_REQUEST, "Invalid Request"));
            }
        };
        self.handle_request(request).await
    }

    pub async fn handle_request(&self, request: Request) -> Option<Response> {
        debug!(method = %request.method, "Received request");
        if request.is_notification() {
            debug!(method = %request.method, "Notification received");
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => Response::success(id, initialize_result()),
            "ping" => Response::success(id, json!({})),
            "tools/list" => {
                info!("Listing available tools");
                Response::success(id, json!({ "tools": tools::tool_definitions() }))
            }
            "tools/call" => self.call_tool(id, request.params).await,
            other => {
                warn!(method = other, "Unknown method");
                Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
            }
        };
        Some(response)
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> Response {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(err)) => {
                return Response::failure(id, INVALID_PARAMS, format!("Invalid params: {err}"))
            }
            None => return Response::failure(id, INVALID_PARAMS, "Missing params"),
        };
        info!(tool = %params.name, "Tool call request");

        let result = if params.name == tools::CREATE_CHECKLIST {
            self.service
                .create_checklist(params.arguments.as_ref())
                .await
        } else {
            let err = ChecklistError::UnknownOperation(params.name);
            error!("{}", err);
            ResponseShaper::error(err.to_string())
        };

        match serde_json::to_value(&result) {
            Ok(value) => Response::success(id, value),
            Err(err) => {
                Response::failure(id, INTERNAL_ERROR, format!("Unserializable result: {err}"))
            }
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION }
    })
}
