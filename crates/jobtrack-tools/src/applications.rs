//! Tools over job applications.
//!
//! | Tool | Required | Notes |
//! |------|----------|-------|
//! | `add_job_application` | `company`, `position` | status → `applied`, date → today |
//! | `get_applications` | – | status / company / position / date filters |
//! | `get_application` | `id` | |
//! | `update_application_status` | `id`, `status` | optional `note` is appended |

use chrono::NaiveDate;
use jobtrack_core::{
  application::{Application, NewApplication, StatusUpdate},
  normalize::{
    check_salary_bounds, optional_text, parse_date, parse_salary, parse_salary_range,
    parse_status, require_text, salary_from_number,
  },
  stats::DateRange,
  store::{ApplicationQuery, TrackerStore},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ToolContext, ToolError, render};

// ─── Shared argument types ───────────────────────────────────────────────────

/// A salary given either as a JSON number or as text such as `"$150k"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SalaryArg {
  Amount(f64),
  Text(String),
}

impl SalaryArg {
  /// `None` for blank text.
  fn normalize(&self) -> jobtrack_core::Result<Option<i64>> {
    match self {
      SalaryArg::Amount(n) => salary_from_number(*n).map(Some),
      SalaryArg::Text(s) if s.trim().is_empty() => Ok(None),
      SalaryArg::Text(s) => parse_salary(s).map(Some),
    }
  }
}

fn optional_date(
  value: Option<String>,
  today: NaiveDate,
) -> jobtrack_core::Result<Option<NaiveDate>> {
  optional_text(value)
    .map(|d| parse_date(&d, today))
    .transpose()
}

// ─── Add ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddArgs {
  #[serde(alias = "company_name")]
  pub company:            String,
  #[serde(alias = "job_title")]
  pub position:           String,
  pub status:             Option<String>,
  #[serde(alias = "application_date")]
  pub applied_date:       Option<String>,
  #[serde(alias = "job_source")]
  pub source:             Option<String>,
  pub salary_min:         Option<SalaryArg>,
  pub salary_max:         Option<SalaryArg>,
  /// Free-form range such as `"$150k - $200k"`. Explicit min/max win.
  pub salary_range:       Option<String>,
  pub job_url:            Option<String>,
  pub location:           Option<String>,
  pub recruiter_name:     Option<String>,
  pub recruiter_email:    Option<String>,
  pub next_followup_date: Option<String>,
  #[serde(alias = "resume_name")]
  pub resume_version:     Option<String>,
  pub notes:              Option<String>,
}

impl AddArgs {
  /// Normalise every field, resolving relative dates against `today`.
  pub fn into_new_application(
    self,
    today: NaiveDate,
  ) -> jobtrack_core::Result<NewApplication> {
    let (range_min, range_max) = match optional_text(self.salary_range) {
      Some(range) => parse_salary_range(&range)?,
      None => (None, None),
    };
    let salary_min = match &self.salary_min {
      Some(arg) => arg.normalize()?.or(range_min),
      None => range_min,
    };
    let salary_max = match &self.salary_max {
      Some(arg) => arg.normalize()?.or(range_max),
      None => range_max,
    };
    check_salary_bounds(salary_min, salary_max)?;

    let status = match optional_text(self.status) {
      Some(s) => parse_status(&s)?,
      None => Default::default(),
    };
    let applied_date = optional_date(self.applied_date, today)?.unwrap_or(today);

    let input = NewApplication {
      company: require_text("company", &self.company)?,
      position: require_text("position", &self.position)?,
      status,
      applied_date,
      source: optional_text(self.source),
      salary_min,
      salary_max,
      job_url: optional_text(self.job_url),
      location: optional_text(self.location),
      recruiter_name: optional_text(self.recruiter_name),
      recruiter_email: optional_text(self.recruiter_email),
      next_followup_date: optional_date(self.next_followup_date, today)?,
      resume_version: optional_text(self.resume_version),
      notes: optional_text(self.notes),
    };
    input.validate()?;
    Ok(input)
  }
}

pub async fn add<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: AddArgs,
) -> Result<String, ToolError> {
  let input = args.into_new_application(ctx.today)?;
  let app = ctx
    .store
    .add_application(input)
    .await
    .map_err(ToolError::store)?;
  Ok(render_added(&app))
}

fn render_added(app: &Application) -> String {
  let mut out = format!(
    "✅ Added application #{}: {} at {}\n• Status: {}\n• Applied: {}",
    app.id, app.position, app.company, app.status, app.applied_date
  );
  if let Some(salary) = render::salary(app.salary_min, app.salary_max) {
    out.push_str(&format!("\n• Salary: {salary}"));
  }
  if let Some(source) = &app.source {
    out.push_str(&format!("\n• Source: {source}"));
  }
  match &app.resume_version {
    Some(resume) => out.push_str(&format!("\n• Resume: {resume}")),
    None => out.push_str("\n• Resume: none linked"),
  }
  out
}

pub fn add_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "company": { "type": "string", "description": "Company name" },
      "position": { "type": "string", "description": "Job title" },
      "status": {
        "type": "string",
        "description": "applied, interviewing, offered, rejected, withdrawn or hired (default: applied)"
      },
      "applied_date": {
        "type": "string",
        "description": "YYYY-MM-DD, MM/DD/YYYY, 'today' or 'yesterday' (default: today)"
      },
      "source": { "type": "string", "description": "Where the posting was found, e.g. LinkedIn" },
      "salary_min": {
        "type": ["number", "string"],
        "description": "Lower salary bound, e.g. 150000 or \"$150k\""
      },
      "salary_max": {
        "type": ["number", "string"],
        "description": "Upper salary bound"
      },
      "salary_range": { "type": "string", "description": "Range such as \"$150k - $200k\"" },
      "job_url": { "type": "string", "description": "Link to the posting" },
      "location": { "type": "string" },
      "recruiter_name": { "type": "string" },
      "recruiter_email": { "type": "string" },
      "next_followup_date": { "type": "string", "description": "When to follow up" },
      "resume_version": {
        "type": "string",
        "description": "Resume version sent (default: the current default resume)"
      },
      "notes": { "type": "string" }
    },
    "required": ["company", "position"]
  })
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListArgs {
  pub status:    Option<String>,
  #[serde(alias = "company_name")]
  pub company:   Option<String>,
  #[serde(alias = "job_title")]
  pub position:  Option<String>,
  pub date_from: Option<String>,
  pub date_to:   Option<String>,
  pub limit:     Option<usize>,
}

impl ListArgs {
  pub fn into_query(self, today: NaiveDate) -> jobtrack_core::Result<ApplicationQuery> {
    if self.limit == Some(0) {
      return Err(jobtrack_core::Error::validation("limit must be at least 1"));
    }
    Ok(ApplicationQuery {
      status:   optional_text(self.status).as_deref().map(parse_status).transpose()?,
      company:  optional_text(self.company),
      position: optional_text(self.position),
      applied:  DateRange::new(
        optional_date(self.date_from, today)?,
        optional_date(self.date_to, today)?,
      )?,
      limit:    self.limit,
    })
  }
}

pub async fn list<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: ListArgs,
) -> Result<String, ToolError> {
  let query = args.into_query(ctx.today)?;
  let apps = ctx
    .store
    .get_applications(&query)
    .await
    .map_err(ToolError::store)?;
  Ok(render_list(&apps))
}

fn render_list(apps: &[Application]) -> String {
  if apps.is_empty() {
    return "No applications found matching your criteria.".to_owned();
  }
  let entries: Vec<String> = apps.iter().map(render::application_entry).collect();
  format!("Found {} application(s):\n\n{}", apps.len(), entries.join("\n"))
}

pub fn list_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "status": { "type": "string", "description": "Only applications with this status" },
      "company": { "type": "string", "description": "Case-insensitive substring of the company" },
      "position": { "type": "string", "description": "Case-insensitive substring of the job title" },
      "date_from": { "type": "string", "description": "Earliest applied date (inclusive)" },
      "date_to": { "type": "string", "description": "Latest applied date (inclusive)" },
      "limit": { "type": "integer", "minimum": 1, "description": "Maximum number of results" }
    },
    "required": []
  })
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GetArgs {
  #[serde(alias = "application_id")]
  pub id: i64,
}

pub async fn get<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: GetArgs,
) -> Result<String, ToolError> {
  let app = ctx
    .store
    .get_application(args.id)
    .await
    .map_err(ToolError::store)?
    .ok_or(jobtrack_core::Error::ApplicationNotFound(args.id))?;
  Ok(render::application_detail(&app))
}

pub fn get_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "id": { "type": "integer", "description": "Application ID" }
    },
    "required": ["id"]
  })
}

// ─── Update status ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateStatusArgs {
  #[serde(alias = "application_id")]
  pub id:     i64,
  #[serde(alias = "new_status")]
  pub status: String,
  #[serde(alias = "notes")]
  pub note:   Option<String>,
}

pub async fn update_status<S: TrackerStore>(
  ctx: &ToolContext<S>,
  args: UpdateStatusArgs,
) -> Result<String, ToolError> {
  let update = StatusUpdate {
    status:   parse_status(&args.status)?,
    note:     optional_text(args.note),
    noted_on: ctx.today,
  };
  let note = update.note.clone();
  let change = ctx
    .store
    .update_application_status(args.id, update)
    .await
    .map_err(ToolError::store)?;

  let app = &change.application;
  let mut out = format!(
    "✅ Updated application #{}: {} at {}\n• Status: {} → {}",
    app.id, app.position, app.company, change.previous, app.status
  );
  if let Some(note) = note {
    out.push_str(&format!("\n• Note added: {note}"));
  }
  Ok(out)
}

pub fn update_status_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "id": { "type": "integer", "description": "Application ID" },
      "status": {
        "type": "string",
        "description": "applied, interviewing, offered, rejected, withdrawn or hired"
      },
      "note": { "type": "string", "description": "Appended to the application's notes" }
    },
    "required": ["id", "status"]
  })
}

#[cfg(test)]
mod tests {
  use jobtrack_core::application::ApplicationStatus;

  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 18).unwrap() }

  fn args(value: Value) -> AddArgs { serde_json::from_value(value).unwrap() }

  #[test]
  fn add_defaults_status_and_date() {
    let input = args(json!({ "company": " Google ", "position": "SRE" }))
      .into_new_application(today())
      .unwrap();
    assert_eq!(input.company, "Google");
    assert_eq!(input.status, ApplicationStatus::Applied);
    assert_eq!(input.applied_date, today());
  }

  #[test]
  fn add_accepts_alternate_argument_names() {
    let input = args(json!({
      "company_name": "Acme",
      "job_title": "Engineer",
      "application_date": "yesterday",
      "job_source": "LinkedIn",
    }))
    .into_new_application(today())
    .unwrap();
    assert_eq!(input.position, "Engineer");
    assert_eq!(input.source.as_deref(), Some("LinkedIn"));
    assert_eq!(input.applied_date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
  }

  #[test]
  fn salary_accepts_numbers_text_and_ranges() {
    let input = args(json!({
      "company": "Acme",
      "position": "Engineer",
      "salary_min": 150000,
      "salary_max": "$1.2m",
    }))
    .into_new_application(today())
    .unwrap();
    assert_eq!((input.salary_min, input.salary_max), (Some(150_000), Some(1_200_000)));

    let ranged = args(json!({
      "company": "Acme",
      "position": "Engineer",
      "salary_range": "$150k - $180k",
    }))
    .into_new_application(today())
    .unwrap();
    assert_eq!((ranged.salary_min, ranged.salary_max), (Some(150_000), Some(180_000)));
  }

  #[test]
  fn inverted_salary_is_rejected() {
    let err = args(json!({
      "company": "Acme",
      "position": "Engineer",
      "salary_min": 200000,
      "salary_max": 100000,
    }))
    .into_new_application(today())
    .unwrap_err();
    assert!(matches!(err, jobtrack_core::Error::Validation(_)));
  }

  #[test]
  fn list_rejects_zero_limit_and_inverted_dates() {
    let zero = ListArgs { limit: Some(0), ..Default::default() };
    assert!(zero.into_query(today()).is_err());

    let inverted = ListArgs {
      date_from: Some("2026-10-10".into()),
      date_to: Some("2026-10-01".into()),
      ..Default::default()
    };
    assert!(inverted.into_query(today()).is_err());
  }

  #[test]
  fn blank_filters_are_ignored() {
    let query = ListArgs { status: Some(" ".into()), company: Some("".into()), ..Default::default() }
      .into_query(today())
      .unwrap();
    assert_eq!(query, ApplicationQuery::default());
  }
}
