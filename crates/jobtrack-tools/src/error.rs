//! Tool error type and its user-facing rendering.

use thiserror::Error;

/// An error returned by a tool handler.
///
/// Everything except [`ToolError::UnknownTool`] is rendered back to the caller
/// as text; an unknown tool is a protocol-level failure.
#[derive(Debug, Error)]
pub enum ToolError {
  #[error("unknown tool: {0}")]
  UnknownTool(String),

  #[error("invalid arguments: {0}")]
  InvalidArguments(String),

  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<jobtrack_core::Error> for ToolError {
  fn from(e: jobtrack_core::Error) -> Self {
    use jobtrack_core::Error as E;
    match e {
      E::Validation(m) => ToolError::Validation(m),
      e @ (E::ApplicationNotFound(_) | E::ResumeNotFound(_)) => {
        ToolError::NotFound(capitalise(&e.to_string()))
      }
      e @ E::ResumeExists(_) => ToolError::Conflict(format!(
        "{}. Use a different name or update the existing resume.",
        capitalise(&e.to_string())
      )),
      E::StoreUnavailable(inner) => ToolError::StoreUnavailable(inner),
    }
  }
}

impl ToolError {
  /// Convert any backend error through the shared taxonomy.
  pub fn store<E: Into<jobtrack_core::Error>>(e: E) -> Self { Self::from(e.into()) }

  /// The text shown to the caller when the tool fails.
  pub fn render(&self) -> String {
    match self {
      ToolError::UnknownTool(name) => format!("❌ Unknown tool: {name}"),
      ToolError::InvalidArguments(m) => format!("❌ Invalid arguments: {m}"),
      ToolError::Validation(m) => format!("❌ Invalid input: {m}"),
      ToolError::NotFound(m) | ToolError::Conflict(m) => format!("❌ {m}"),
      ToolError::StoreUnavailable(_) => {
        "❌ The job tracker database is unavailable right now. Please try again."
          .to_owned()
      }
    }
  }
}

fn capitalise(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
