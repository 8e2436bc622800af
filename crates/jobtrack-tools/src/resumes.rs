//! Tools over resume versions.

use jobtrack_core::{
  normalize::{optional_text, require_text},
  resume::NewResumeVersion,
  store::TrackerStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ToolContext, ToolError};

fn name_schema(description: &str) -> Value {
  json!({
    "type": "object",
    "properties": {
      "name": { "type": "string", "description": description }
    },
    "required": ["name"]
  })
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddArgs {
  #[serde(alias = "resume_name")]
  pub name:        String,
  pub content:     String,
  pub description: Option<String>,
  #[serde(default, alias = "set_as_default")]
  pub is_default:  bool,
}

pub async fn add<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: AddArgs,
) -> Result<String, ToolError> {
  let input = NewResumeVersion {
    name:        require_text("name", &args.name)?,
    content:     args.content,
    description: optional_text(args.description),
    is_default:  args.is_default,
  };
  input.validate()?;

  let resume = ctx
    .store
    .add_resume_version(input)
    .await
    .map_err(ToolError::store)?;

  let mut out = format!(
    "✅ Added resume version '{}' ({} characters)",
    resume.name,
    resume.content.chars().count()
  );
  if resume.is_default {
    out.push_str("\n• Set as the default resume");
  }
  Ok(out)
}

pub fn add_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "name": { "type": "string", "description": "Unique name, e.g. \"backend-focused\"" },
      "content": { "type": "string", "description": "Full resume text" },
      "description": { "type": "string", "description": "What this version emphasises" },
      "is_default": {
        "type": "boolean",
        "description": "Make this the default resume (default: false)"
      }
    },
    "required": ["name", "content"]
  })
}

// ─── Set default ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NameArgs {
  #[serde(alias = "resume_name")]
  pub name: String,
}

pub async fn set_default<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: NameArgs,
) -> Result<String, ToolError> {
  let name = require_text("name", &args.name)?;
  match ctx.store.set_default_resume(name).await.map_err(ToolError::store) {
    Ok(resume) => Ok(format!("✅ '{}' is now the default resume", resume.name)),
    Err(ToolError::NotFound(msg)) => {
      // Help the caller pick a valid name.
      let available = ctx.store.list_resumes().await.map_err(ToolError::store)?;
      let hint = if available.is_empty() {
        "No resume versions have been added yet.".to_owned()
      } else {
        let names: Vec<&str> = available.iter().map(|r| r.name.as_str()).collect();
        format!("Available: {}", names.join(", "))
      };
      Err(ToolError::NotFound(format!("{msg}. {hint}")))
    }
    Err(e) => Err(e),
  }
}

pub fn set_default_schema() -> Value { name_schema("Resume version to make the default") }

// ─── Get content ─────────────────────────────────────────────────────────────

pub async fn get_content<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: NameArgs,
) -> Result<String, ToolError> {
  let name = require_text("name", &args.name)?;
  let resume = ctx
    .store
    .get_resume(name.clone())
    .await
    .map_err(ToolError::store)?
    .ok_or(jobtrack_core::Error::ResumeNotFound(name))?;

  let mut header = format!("Resume version '{}'", resume.name);
  if resume.is_default {
    header.push_str(" (default)");
  }
  if let Some(description) = &resume.description {
    header.push_str(&format!("\n{description}"));
  }
  Ok(format!("{header}\n\n{}", resume.content))
}

pub fn get_content_schema() -> Value { name_schema("Resume version to read") }

// ─── List ────────────────────────────────────────────────────────────────────

pub async fn list<S: TrackerStore>(ctx: &ToolContext<S>) -> Result<String, ToolError> {
  let resumes = ctx.store.list_resumes().await.map_err(ToolError::store)?;
  if resumes.is_empty() {
    return Ok("No resume versions stored yet.".to_owned());
  }

  let mut out = format!("{} resume version(s):\n", resumes.len());
  for r in &resumes {
    let marker = if r.is_default { " ⭐ default" } else { "" };
    out.push_str(&format!(
      "\n• **{}**{marker} (updated {})",
      r.name,
      r.updated_at.format("%Y-%m-%d")
    ));
    if let Some(description) = &r.description {
      out.push_str(&format!("\n  {description}"));
    }
  }
  Ok(out)
}

pub fn list_schema() -> Value {
  json!({ "type": "object", "properties": {}, "required": [] })
}
