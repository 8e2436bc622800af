//! Plain-text rendering shared by the tool handlers.

use std::fmt::Write as _;

use jobtrack_core::application::Application;

/// `150000` → `$150,000`.
pub fn money(amount: i64) -> String {
  let digits = amount.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  if amount < 0 { format!("-${grouped}") } else { format!("${grouped}") }
}

pub fn salary(min: Option<i64>, max: Option<i64>) -> Option<String> {
  match (min, max) {
    (Some(lo), Some(hi)) if lo == hi => Some(money(lo)),
    (Some(lo), Some(hi)) => Some(format!("{} – {}", money(lo), money(hi))),
    (Some(lo), None) => Some(format!("{}+", money(lo))),
    (None, Some(hi)) => Some(format!("up to {}", money(hi))),
    (None, None) => None,
  }
}

/// A compact multi-line entry used in listings.
pub fn application_entry(app: &Application) -> String {
  let mut out = format!("• **{}** at **{}**\n", app.position, app.company);
  let _ = writeln!(
    out,
    "  Applied: {} | Status: {} | Resume: {}",
    app.applied_date,
    app.status,
    app.resume_version.as_deref().unwrap_or("none"),
  );
  if let Some(s) = salary(app.salary_min, app.salary_max) {
    let _ = writeln!(out, "  Salary: {s}");
  }
  if let Some(source) = &app.source {
    let _ = writeln!(out, "  Source: {source}");
  }
  if let Some(notes) = &app.notes {
    let _ = writeln!(out, "  Notes: {}", indent_continuation(notes, "    "));
  }
  let _ = writeln!(out, "  ID: {}", app.id);
  out
}

/// Every populated field, one per line.
pub fn application_detail(app: &Application) -> String {
  let mut out = format!("**{}** at **{}** (ID {})\n", app.position, app.company, app.id);
  let _ = writeln!(out, "• Status: {}", app.status);
  let _ = writeln!(out, "• Applied: {}", app.applied_date);

  let optional = [
    ("Source", app.source.clone()),
    ("Salary", salary(app.salary_min, app.salary_max)),
    ("Location", app.location.clone()),
    ("Job URL", app.job_url.clone()),
    ("Recruiter", app.recruiter_name.clone()),
    ("Recruiter email", app.recruiter_email.clone()),
    ("Next follow-up", app.next_followup_date.map(|d| d.to_string())),
    ("Resume", app.resume_version.clone()),
  ];
  for (label, value) in optional {
    if let Some(value) = value {
      let _ = writeln!(out, "• {label}: {value}");
    }
  }
  if let Some(notes) = &app.notes {
    let _ = writeln!(out, "• Notes:\n{}", indent_all(notes, "  "));
  }
  let _ = writeln!(out, "• Last updated: {}", app.updated_at.format("%Y-%m-%d %H:%M UTC"));
  out
}

fn indent_continuation(text: &str, prefix: &str) -> String {
  text.lines().collect::<Vec<_>>().join(&format!("\n{prefix}"))
}

fn indent_all(text: &str, prefix: &str) -> String {
  text
    .lines()
    .map(|l| format!("{prefix}{l}"))
    .collect::<Vec<_>>()
    .join("\n")
}
