//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`
//! (so they sort lexically), and booleans as `0`/`1`.

use chrono::{DateTime, NaiveDate, Utc};
use jobtrack_core::{
  application::{Application, ApplicationStatus},
  resume::{ResumeSummary, ResumeVersion},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── ApplicationStatus ───────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  // Exact match only; aliases are an input convenience, never stored.
  ApplicationStatus::ALL
    .into_iter()
    .find(|status| status.as_str() == s)
    .ok_or_else(|| Error::UnknownStatus(s.to_owned()))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` for a `LIKE ... ESCAPE '\'` substring match.
pub fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawApplication::from_row`]. Expects
/// `job_applications a LEFT JOIN resume_versions r`.
pub const APPLICATION_COLUMNS: &str = "
  a.id, a.company, a.position, a.status, a.applied_date, a.source,
  a.salary_min, a.salary_max, a.job_url, a.location,
  a.recruiter_name, a.recruiter_email, a.next_followup_date,
  r.name, a.notes, a.created_at, a.updated_at";

/// Raw values read directly from a `job_applications` row joined with its
/// resume name.
pub struct RawApplication {
  pub id:                 i64,
  pub company:            String,
  pub position:           String,
  pub status:             String,
  pub applied_date:       String,
  pub source:             Option<String>,
  pub salary_min:         Option<i64>,
  pub salary_max:         Option<i64>,
  pub job_url:            Option<String>,
  pub location:           Option<String>,
  pub recruiter_name:     Option<String>,
  pub recruiter_email:    Option<String>,
  pub next_followup_date: Option<String>,
  pub resume_version:     Option<String>,
  pub notes:              Option<String>,
  pub created_at:         String,
  pub updated_at:         String,
}

impl RawApplication {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      company:            row.get(1)?,
      position:           row.get(2)?,
      status:             row.get(3)?,
      applied_date:       row.get(4)?,
      source:             row.get(5)?,
      salary_min:         row.get(6)?,
      salary_max:         row.get(7)?,
      job_url:            row.get(8)?,
      location:           row.get(9)?,
      recruiter_name:     row.get(10)?,
      recruiter_email:    row.get(11)?,
      next_followup_date: row.get(12)?,
      resume_version:     row.get(13)?,
      notes:              row.get(14)?,
      created_at:         row.get(15)?,
      updated_at:         row.get(16)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      id:                 self.id,
      company:            self.company,
      position:           self.position,
      status:             decode_status(&self.status)?,
      applied_date:       decode_date(&self.applied_date)?,
      source:             self.source,
      salary_min:         self.salary_min,
      salary_max:         self.salary_max,
      job_url:            self.job_url,
      location:           self.location,
      recruiter_name:     self.recruiter_name,
      recruiter_email:    self.recruiter_email,
      next_followup_date: self
        .next_followup_date
        .as_deref()
        .map(decode_date)
        .transpose()?,
      resume_version:     self.resume_version,
      notes:              self.notes,
      created_at:         decode_dt(&self.created_at)?,
      updated_at:         decode_dt(&self.updated_at)?,
    })
  }
}

pub const RESUME_COLUMNS: &str =
  "id, name, content, description, is_default, created_at, updated_at";

/// Raw values read directly from a `resume_versions` row.
pub struct RawResume {
  pub id:          i64,
  pub name:        String,
  pub content:     String,
  pub description: Option<String>,
  pub is_default:  bool,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawResume {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      content:     row.get(2)?,
      description: row.get(3)?,
      is_default:  row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
    })
  }

  pub fn into_resume(self) -> Result<ResumeVersion> {
    Ok(ResumeVersion {
      id:          self.id,
      name:        self.name,
      content:     self.content,
      description: self.description,
      is_default:  self.is_default,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values for the resume listing; no content column.
pub struct RawResumeSummary {
  pub name:        String,
  pub description: Option<String>,
  pub is_default:  bool,
  pub updated_at:  String,
}

impl RawResumeSummary {
  pub fn into_summary(self) -> Result<ResumeSummary> {
    Ok(ResumeSummary {
      name:        self.name,
      description: self.description,
      is_default:  self.is_default,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
