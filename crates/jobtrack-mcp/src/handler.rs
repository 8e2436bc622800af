//! Transport-independent JSON-RPC handling.
//!
//! Both transports hand raw message text to [`Server::handle_message`] and
//! write back whatever it returns. `None` means there is nothing to send:
//! the message was a notification, or a batch made only of notifications.

use std::sync::Arc;

use jobtrack_core::store::TrackerStore;
use jobtrack_tools::{ToolContext, ToolError, catalog, dispatch};
use serde_json::{Value, json};

use crate::{
  error::RpcError,
  protocol::{
    CallToolParams, InitializeParams, JSONRPC_VERSION, Request, Response,
    negotiate_version,
  },
};

/// An MCP server bound to one store.
pub struct Server<S> {
  store:   Arc<S>,
  name:    String,
  version: &'static str,
}

impl<S: TrackerStore> Server<S> {
  pub fn new(store: Arc<S>, name: impl Into<String>) -> Self {
    Self { store, name: name.into(), version: env!("CARGO_PKG_VERSION") }
  }

  pub fn name(&self) -> &str { &self.name }

  /// Handle one raw message: a single request, a notification, or a batch.
  pub async fn handle_message(&self, raw: &str) -> Option<Value> {
    let value: Value = match serde_json::from_str(raw) {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!(error = %e, "unparseable message");
        return Some(to_value(Response::failure(Value::Null, RpcError::parse_error(e))));
      }
    };

    match value {
      Value::Array(items) if items.is_empty() => Some(to_value(Response::failure(
        Value::Null,
        RpcError::invalid_request("empty batch"),
      ))),
      Value::Array(items) => {
        let mut replies = Vec::with_capacity(items.len());
        for item in items {
          if let Some(reply) = self.handle_value(item).await {
            replies.push(to_value(reply));
          }
        }
        (!replies.is_empty()).then_some(Value::Array(replies))
      }
      single => self.handle_value(single).await.map(to_value),
    }
  }

  /// Handle one decoded message. Returns `None` for notifications.
  pub async fn handle_value(&self, value: Value) -> Option<Response> {
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: Request = match serde_json::from_value(value) {
      Ok(r) => r,
      Err(e) => return Some(Response::failure(id, RpcError::invalid_request(e))),
    };
    if request.jsonrpc != JSONRPC_VERSION {
      return Some(Response::failure(
        id,
        RpcError::invalid_request(format!("unsupported jsonrpc version {:?}", request.jsonrpc)),
      ));
    }
    self.handle_request(request).await
  }

  pub async fn handle_request(&self, request: Request) -> Option<Response> {
    if request.is_notification() {
      tracing::debug!(method = %request.method, "notification");
      return None;
    }
    let id = request.id.unwrap_or_default();

    tracing::debug!(method = %request.method, "request");
    Some(match self.call(&request.method, request.params).await {
      Ok(result) => Response::success(id, result),
      Err(error) => Response::failure(id, error),
    })
  }

  async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
    match method {
      "initialize" => {
        let params: InitializeParams = match params {
          Some(p) => serde_json::from_value(p).map_err(RpcError::invalid_params)?,
          None => InitializeParams::default(),
        };
        let version = negotiate_version(params.protocol_version.as_deref());
        tracing::info!(protocol_version = version, client = ?params.client_info, "initialize");
        Ok(json!({
          "protocolVersion": version,
          "capabilities": { "tools": { "listChanged": false } },
          "serverInfo": { "name": self.name, "version": self.version },
          "instructions": "Track job applications and resume versions. \
                           Dates accept YYYY-MM-DD, MM/DD/YYYY, 'today' or 'yesterday'."
        }))
      }
      "ping" => Ok(json!({})),
      "tools/list" => Ok(json!({ "tools": catalog() })),
      "tools/call" => {
        let params: CallToolParams = params
          .ok_or_else(|| RpcError::invalid_params("tools/call requires params"))
          .and_then(|p| serde_json::from_value(p).map_err(RpcError::invalid_params))?;

        let ctx = ToolContext::new(self.store.clone());
        match dispatch(&ctx, &params.name, params.arguments).await {
          Ok(output) => Ok(json!({
            "content": [{ "type": "text", "text": output.text }],
            "isError": output.is_error,
          })),
          Err(ToolError::UnknownTool(name)) => {
            tracing::warn!(tool = %name, "unknown tool");
            Err(RpcError::unknown_tool(&name))
          }
          Err(other) => Err(RpcError::internal(other)),
        }
      }
      other if other.starts_with("notifications/") => Ok(json!({})),
      other => Err(RpcError::method_not_found(other)),
    }
  }
}

fn to_value(response: Response) -> Value {
  // `Response` holds only strings, numbers and `Value`s.
  serde_json::to_value(response).unwrap_or(Value::Null)
}
