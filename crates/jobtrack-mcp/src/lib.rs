//! Model Context Protocol server for the job tracker.
//!
//! Exposes the tools from [`jobtrack_tools`] over JSON-RPC 2.0, either as
//! newline-delimited messages on stdio ([`stdio::serve`]) or over HTTP via
//! the axum [`Router`] returned by [`router`].

pub mod error;
pub mod handler;
pub mod protocol;
pub mod settings;
pub mod stdio;

pub use error::{Error, RpcError};
pub use handler::Server;
pub use settings::{ServerConfig, Transport};

use std::sync::Arc;

use axum::{
  Json, Router,
  body::Bytes,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use jobtrack_core::store::TrackerStore;
use serde_json::json;
use tower_http::trace::TraceLayer;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through the HTTP handlers.
pub struct AppState<S> {
  pub server: Arc<Server<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self { Self { server: self.server.clone() } }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the HTTP transport: `POST /mcp` for JSON-RPC, `GET /health`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TrackerStore + 'static,
{
  Router::new()
    .route("/mcp", post(mcp_handler::<S>))
    .route("/health", get(health_handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn mcp_handler<S>(State(state): State<AppState<S>>, body: Bytes) -> Response
where
  S: TrackerStore + 'static,
{
  // Parse failures are JSON-RPC errors in a 200 body, whatever their cause.
  let Ok(text) = std::str::from_utf8(&body) else {
    let reply = protocol::Response::failure(
      serde_json::Value::Null,
      RpcError::parse_error("body is not valid UTF-8"),
    );
    return Json(reply).into_response();
  };

  match state.server.handle_message(text).await {
    Some(reply) => Json(reply).into_response(),
    None => StatusCode::ACCEPTED.into_response(),
  }
}

async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
  S: TrackerStore + 'static,
{
  Json(json!({ "status": "ok", "server": state.server.name() })).into_response()
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{body::Body, http::Request};
  use jobtrack_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState { server: Arc::new(Server::new(Arc::new(store), "http-test")) }
  }

  async fn oneshot_raw(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   &str,
  ) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn health_reports_ok() {
    let resp = oneshot_raw(make_state().await, "GET", "/health", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["server"], "http-test");
  }

  #[tokio::test]
  async fn post_mcp_answers_requests() {
    let resp = oneshot_raw(
      make_state().await,
      "POST",
      "/mcp",
      r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], 1);
    assert!(body["result"]["tools"].is_array());
  }

  #[tokio::test]
  async fn state_persists_across_requests() {
    let state = make_state().await;
    let add = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{
      "name":"add_job_application",
      "arguments":{"company":"Google","position":"SRE"}}}"#;
    let resp = oneshot_raw(state.clone(), "POST", "/mcp", add).await;
    assert_eq!(body_json(resp).await["result"]["isError"], false);

    let list = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{
      "name":"get_applications","arguments":{"company":"goo"}}}"#;
    let body = body_json(oneshot_raw(state, "POST", "/mcp", list).await).await;
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Found 1 application(s)"), "{text}");
  }

  #[tokio::test]
  async fn notification_returns_202() {
    let resp = oneshot_raw(
      make_state().await,
      "POST",
      "/mcp",
      r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
  }

  #[tokio::test]
  async fn malformed_body_is_a_parse_error() {
    let resp = oneshot_raw(make_state().await, "POST", "/mcp", "{oops").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["error"]["code"], error::PARSE_ERROR);
  }

  #[tokio::test]
  async fn non_utf8_body_is_a_parse_error_with_the_same_status() {
    let req = Request::builder()
      .method("POST")
      .uri("/mcp")
      .header("content-type", "application/json")
      .body(Body::from(vec![b'{', 0xff, 0xfe, b'}']))
      .unwrap();
    let resp = router(make_state().await).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], error::PARSE_ERROR);
    assert_eq!(body["id"], Value::Null);
  }
}
