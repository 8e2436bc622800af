//! JSON-RPC 2.0 message shapes used by the Model Context Protocol.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol revisions this server can speak, oldest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] =
  &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Offered when the client asks for a revision we do not know.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// An incoming request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
  pub jsonrpc: String,
  /// `None` only when the member is absent (a notification). An explicit
  /// `"id": null` is `Some(Value::Null)`.
  #[serde(default, deserialize_with = "present")]
  pub id:      Option<Value>,
  pub method:  String,
  #[serde(default)]
  pub params:  Option<Value>,
}

impl Request {
  pub fn is_notification(&self) -> bool { self.id.is_none() }
}

/// Only called when the member exists, so `null` stays distinguishable from
/// absence.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
  pub jsonrpc: &'static str,
  pub id:      Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result:  Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<RpcError>,
}

impl Response {
  pub fn success(id: Value, result: Value) -> Self {
    Self { jsonrpc: JSONRPC_VERSION, id, result: Some(result), error: None }
  }

  pub fn failure(id: Value, error: RpcError) -> Self {
    Self { jsonrpc: JSONRPC_VERSION, id, result: None, error: Some(error) }
  }
}

// ─── Method params ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
  #[serde(default)]
  pub protocol_version: Option<String>,
  #[serde(default)]
  pub client_info:      Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
  pub name:      String,
  #[serde(default)]
  pub arguments: Option<Value>,
}

/// Pick the revision to answer `initialize` with: the client's, if we
/// support it, otherwise our latest.
pub fn negotiate_version(requested: Option<&str>) -> &'static str {
  requested
    .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
    .copied()
    .unwrap_or(LATEST_PROTOCOL_VERSION)
}
