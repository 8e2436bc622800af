//! JSON-RPC error objects and transport errors.

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

// ─── JSON-RPC error codes ────────────────────────────────────────────────────

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message} ({code})")]
pub struct RpcError {
  pub code:    i64,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<Value>,
}

impl RpcError {
  pub fn new(code: i64, message: impl Into<String>) -> Self {
    Self { code, message: message.into(), data: None }
  }

  pub fn with_data(mut self, data: Value) -> Self {
    self.data = Some(data);
    self
  }

  pub fn parse_error(detail: impl std::fmt::Display) -> Self {
    Self::new(PARSE_ERROR, format!("Parse error: {detail}"))
  }

  pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
    Self::new(INVALID_REQUEST, format!("Invalid request: {detail}"))
  }

  pub fn method_not_found(method: &str) -> Self {
    Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
      .with_data(json!({ "method": method }))
  }

  pub fn unknown_tool(name: &str) -> Self {
    Self::new(METHOD_NOT_FOUND, format!("Unknown tool: {name}"))
      .with_data(json!({ "tool": name }))
  }

  pub fn invalid_params(detail: impl std::fmt::Display) -> Self {
    Self::new(INVALID_PARAMS, format!("Invalid params: {detail}"))
  }

  pub fn internal(detail: impl std::fmt::Display) -> Self {
    Self::new(INTERNAL_ERROR, format!("Internal error: {detail}"))
  }
}

// ─── Transport errors ────────────────────────────────────────────────────────

/// A failure that ends a transport loop.
#[derive(Debug, Error)]
pub enum Error {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}
