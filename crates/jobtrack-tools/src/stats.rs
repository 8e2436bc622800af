//! The `get_application_stats` tool.

use std::fmt::Write as _;

use jobtrack_core::{
  application::ApplicationStatus,
  normalize::{optional_text, parse_window},
  stats::{ApplicationStats, StatsWindow},
  store::TrackerStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ToolContext, ToolError};

#[derive(Debug, Default, Deserialize)]
pub struct StatsArgs {
  #[serde(alias = "period", alias = "time_window")]
  pub window: Option<String>,
}

pub async fn get<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: StatsArgs,
) -> Result<String, ToolError> {
  let window = match optional_text(args.window) {
    Some(w) => parse_window(&w)?,
    None => StatsWindow::default(),
  };
  let stats = ctx
    .store
    .application_stats(window.range(ctx.today))
    .await
    .map_err(ToolError::store)?;
  Ok(render(window, &stats))
}

fn render(window: StatsWindow, stats: &ApplicationStats) -> String {
  let mut out = match (stats.range.from, stats.range.to) {
    (Some(from), Some(to)) if from == to => {
      format!("📊 Application statistics ({window}: {from})\n")
    }
    (Some(from), Some(to)) => {
      format!("📊 Application statistics ({window}: {from} to {to})\n")
    }
    _ => "📊 Application statistics (all time)\n".to_owned(),
  };
  let _ = writeln!(out, "Total: {}", stats.total);
  if stats.total == 0 {
    out.push_str("\nNo applications recorded in this period.");
    return out;
  }

  out.push_str("\nBy status:\n");
  for status in ApplicationStatus::ALL {
    let _ = writeln!(out, "• {status}: {}", stats.count(status));
  }

  if !stats.top_companies.is_empty() {
    out.push_str("\nTop companies:\n");
    for (company, n) in &stats.top_companies {
      let _ = writeln!(out, "• {company}: {n}");
    }
  }

  if !stats.by_resume.is_empty() {
    out.push_str("\nBy resume:\n");
    for (resume, n) in &stats.by_resume {
      let _ = writeln!(out, "• {}: {n}", resume.as_deref().unwrap_or("(none)"));
    }
  }
  out.truncate(out.trim_end().len());
  out
}

pub fn schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "window": {
        "type": "string",
        "enum": ["all", "today", "this_week", "this_month", "last_30_days", "this_year"],
        "description": "Only count applications in this period (default: all)"
      }
    },
    "required": []
  })
}
