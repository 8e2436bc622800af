//! Named tools over a [`TrackerStore`].
//!
//! Each tool has a stable name, a JSON Schema describing its arguments, and a
//! handler that validates input, calls the store, and renders a plain-text
//! summary. The protocol layer only needs [`catalog`] and [`dispatch`].
//!
//! ```rust,ignore
//! let ctx = ToolContext::new(Arc::new(store));
//! let out = dispatch(&ctx, "list_resumes", None).await?;
//! println!("{}", out.text);
//! ```

pub mod applications;
pub mod error;
mod render;
pub mod resumes;
pub mod stats;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use jobtrack_core::store::TrackerStore;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _, IntoStaticStr};

pub use error::ToolError;

// ─── Tool table ──────────────────────────────────────────────────────────────

/// Every tool the server exposes. The string form is the wire name.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
  AddJobApplication,
  GetApplications,
  GetApplication,
  UpdateApplicationStatus,
  AddResumeVersion,
  SetDefaultResume,
  GetResumeContent,
  ListResumes,
  GetApplicationStats,
}

impl Tool {
  pub fn name(self) -> &'static str { self.into() }

  pub fn description(self) -> &'static str {
    match self {
      Tool::AddJobApplication => {
        "Record a new job application. Status defaults to 'applied' and the \
         applied date to today. The default resume is linked unless another \
         resume_version is named."
      }
      Tool::GetApplications => {
        "List job applications, most recent first, optionally filtered by \
         status, company, position and applied-date range."
      }
      Tool::GetApplication => "Show every recorded detail of one application.",
      Tool::UpdateApplicationStatus => {
        "Change an application's status. An optional note is appended to the \
         application's notes with today's date."
      }
      Tool::AddResumeVersion => {
        "Store a new named resume version, optionally making it the default."
      }
      Tool::SetDefaultResume => {
        "Make the named resume version the default for new applications."
      }
      Tool::GetResumeContent => "Return the full text of a resume version.",
      Tool::ListResumes => "List stored resume versions, marking the default.",
      Tool::GetApplicationStats => {
        "Summarise applications: totals by status, top companies, and resume \
         usage, optionally limited to a time window."
      }
    }
  }

  pub fn input_schema(self) -> Value {
    match self {
      Tool::AddJobApplication => applications::add_schema(),
      Tool::GetApplications => applications::list_schema(),
      Tool::GetApplication => applications::get_schema(),
      Tool::UpdateApplicationStatus => applications::update_status_schema(),
      Tool::AddResumeVersion => resumes::add_schema(),
      Tool::SetDefaultResume => resumes::set_default_schema(),
      Tool::GetResumeContent => resumes::get_content_schema(),
      Tool::ListResumes => resumes::list_schema(),
      Tool::GetApplicationStats => stats::schema(),
    }
  }
}

/// The advertised shape of one tool, as listed to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
  pub name:         &'static str,
  pub description:  &'static str,
  pub input_schema: Value,
}

/// Descriptors for every tool, in declaration order.
pub fn catalog() -> Vec<ToolDescriptor> {
  Tool::iter()
    .map(|tool| ToolDescriptor {
      name:         tool.name(),
      description:  tool.description(),
      input_schema: tool.input_schema(),
    })
    .collect()
}

// ─── Context & output ────────────────────────────────────────────────────────

/// What every handler gets: the store, and the date relative inputs such as
/// `today` resolve against.
#[derive(Debug)]
pub struct ToolContext<S> {
  pub store: Arc<S>,
  pub today: NaiveDate,
}

impl<S> ToolContext<S> {
  /// A context dated to the local calendar day.
  pub fn new(store: Arc<S>) -> Self {
    Self { store, today: Local::now().date_naive() }
  }

  pub fn with_today(store: Arc<S>, today: NaiveDate) -> Self { Self { store, today } }
}

impl<S> Clone for ToolContext<S> {
  fn clone(&self) -> Self { Self { store: self.store.clone(), today: self.today } }
}

/// The rendered result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
  pub text:     String,
  pub is_error: bool,
}

impl ToolOutput {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: text.into(), is_error: false }
  }

  pub fn error(text: impl Into<String>) -> Self {
    Self { text: text.into(), is_error: true }
  }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Run the tool called `name` with `arguments`.
///
/// Only an unknown tool name is returned as `Err`. Every other failure is
/// rendered into a [`ToolOutput`] with `is_error` set, so the caller always
/// gets a readable message.
pub async fn dispatch<S: TrackerStore>(
  ctx: &ToolContext<S>,
  name: &str,
  arguments: Option<Value>,
) -> Result<ToolOutput, ToolError> {
  let tool: Tool = name
    .parse()
    .map_err(|_| ToolError::UnknownTool(name.to_owned()))?;

  tracing::info!(tool = tool.name(), "tool call");

  match run(ctx, tool, arguments).await {
    Ok(text) => Ok(ToolOutput::text(text)),
    Err(e) => {
      match &e {
        ToolError::StoreUnavailable(source) => {
          tracing::error!(tool = tool.name(), error = %source, "store failure");
        }
        other => tracing::warn!(tool = tool.name(), error = %other, "tool failed"),
      }
      Ok(ToolOutput::error(e.render()))
    }
  }
}

async fn run<S: TrackerStore>(
  ctx: &ToolContext<S>,
  tool: Tool,
  arguments: Option<Value>,
) -> Result<String, ToolError> {
  match tool {
    Tool::AddJobApplication => applications::add(ctx, decode(arguments)?).await,
    Tool::GetApplications => applications::list(ctx, decode(arguments)?).await,
    Tool::GetApplication => applications::get(ctx, decode(arguments)?).await,
    Tool::UpdateApplicationStatus => {
      applications::update_status(ctx, decode(arguments)?).await
    }
    Tool::AddResumeVersion => resumes::add(ctx, decode(arguments)?).await,
    Tool::SetDefaultResume => resumes::set_default(ctx, decode(arguments)?).await,
    Tool::GetResumeContent => resumes::get_content(ctx, decode(arguments)?).await,
    Tool::ListResumes => resumes::list(ctx).await,
    Tool::GetApplicationStats => stats::get(ctx, decode(arguments)?).await,
  }
}

/// Deserialize tool arguments. Absent or `null` arguments read as `{}`.
fn decode<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, ToolError> {
  let value = match arguments {
    None | Some(Value::Null) => Value::Object(Default::default()),
    Some(v) => v,
  };
  serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}
