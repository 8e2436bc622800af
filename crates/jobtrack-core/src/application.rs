//! Job applications — the primary tracked entity.
//!
//! An application is created once, then moves through the fixed
//! [`ApplicationStatus`] lifecycle. Status changes may carry a note, which is
//! appended to the application's running notes rather than replacing them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The stage an application has reached. The set is closed; the store's
/// `CHECK` constraint lists exactly these values.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ApplicationStatus {
  #[default]
  #[strum(to_string = "applied")]
  Applied,
  #[strum(to_string = "interviewing", serialize = "interview")]
  Interviewing,
  #[strum(to_string = "offered", serialize = "offer")]
  Offered,
  #[strum(to_string = "rejected")]
  Rejected,
  #[strum(to_string = "withdrawn", serialize = "withdrew")]
  Withdrawn,
  #[strum(to_string = "hired")]
  Hired,
}

impl ApplicationStatus {
  pub const ALL: [Self; 6] = [
    Self::Applied,
    Self::Interviewing,
    Self::Offered,
    Self::Rejected,
    Self::Withdrawn,
    Self::Hired,
  ];

  /// The value stored in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Applied => "applied",
      Self::Interviewing => "interviewing",
      Self::Offered => "offered",
      Self::Rejected => "rejected",
      Self::Withdrawn => "withdrawn",
      Self::Hired => "hired",
    }
  }

  /// Comma-separated list of every canonical status, for error messages.
  pub fn allowed_values() -> String {
    Self::ALL.map(Self::as_str).join(", ")
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// A persisted job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
  /// Store-assigned surrogate key; immutable once created.
  pub id:                 i64,
  pub company:            String,
  pub position:           String,
  pub status:             ApplicationStatus,
  pub applied_date:       NaiveDate,
  /// Where the posting was found, e.g. "LinkedIn".
  pub source:             Option<String>,
  pub salary_min:         Option<i64>,
  pub salary_max:         Option<i64>,
  pub job_url:            Option<String>,
  pub location:           Option<String>,
  pub recruiter_name:     Option<String>,
  pub recruiter_email:    Option<String>,
  pub next_followup_date: Option<NaiveDate>,
  /// Name of the resume version sent with this application.
  pub resume_version:     Option<String>,
  pub notes:              Option<String>,
  pub created_at:         DateTime<Utc>,
  pub updated_at:         DateTime<Utc>,
}

// ─── NewApplication ──────────────────────────────────────────────────────────

/// Input to [`crate::store::TrackerStore::add_application`].
///
/// `id`, `created_at` and `updated_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
  pub company:            String,
  pub position:           String,
  pub status:             ApplicationStatus,
  pub applied_date:       NaiveDate,
  pub source:             Option<String>,
  pub salary_min:         Option<i64>,
  pub salary_max:         Option<i64>,
  pub job_url:            Option<String>,
  pub location:           Option<String>,
  pub recruiter_name:     Option<String>,
  pub recruiter_email:    Option<String>,
  pub next_followup_date: Option<NaiveDate>,
  /// Resume version to link. `None` links the current default, if any.
  pub resume_version:     Option<String>,
  pub notes:              Option<String>,
}

impl NewApplication {
  /// Convenience constructor with all optional fields unset and the default
  /// status.
  pub fn new(
    company: impl Into<String>,
    position: impl Into<String>,
    applied_date: NaiveDate,
  ) -> Self {
    Self {
      company: company.into(),
      position: position.into(),
      status: ApplicationStatus::default(),
      applied_date,
      source: None,
      salary_min: None,
      salary_max: None,
      job_url: None,
      location: None,
      recruiter_name: None,
      recruiter_email: None,
      next_followup_date: None,
      resume_version: None,
      notes: None,
    }
  }

  /// Check the invariants the store relies on.
  pub fn validate(&self) -> Result<()> {
    if self.company.trim().is_empty() {
      return Err(Error::validation("company must not be empty"));
    }
    if self.position.trim().is_empty() {
      return Err(Error::validation("position must not be empty"));
    }
    if let (Some(min), Some(max)) = (self.salary_min, self.salary_max)
      && min > max
    {
      return Err(Error::validation(format!(
        "salary_min ({min}) must not exceed salary_max ({max})"
      )));
    }
    Ok(())
  }
}

// ─── Status changes ──────────────────────────────────────────────────────────

/// Input to [`crate::store::TrackerStore::update_application_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
  pub status:   ApplicationStatus,
  pub note:     Option<String>,
  /// Date stamped onto the appended note line.
  pub noted_on: NaiveDate,
}

impl StatusUpdate {
  /// The line appended to the notes column, or `None` when there is no note.
  pub fn note_line(&self) -> Option<String> {
    self
      .note
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .map(|n| format!("[{}] {}: {n}", self.noted_on.format("%Y-%m-%d"), self.status))
  }
}

/// Append `line` to an existing notes value, one entry per line.
pub fn append_note(existing: Option<String>, line: &str) -> String {
  match existing {
    Some(notes) if !notes.is_empty() => format!("{notes}\n{line}"),
    _ => line.to_owned(),
  }
}

/// The result of a status change: the status it moved from, and the record
/// as it now stands.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
  pub previous:    ApplicationStatus,
  pub application: Application,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn status_parses_case_insensitively_and_with_aliases() {
    assert_eq!("Applied".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Applied);
    assert_eq!("INTERVIEW".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Interviewing);
    assert_eq!("offer".parse::<ApplicationStatus>().unwrap(), ApplicationStatus::Offered);
    assert!("ghosted".parse::<ApplicationStatus>().is_err());
  }

  #[test]
  fn status_display_matches_column_value() {
    use strum::IntoEnumIterator as _;

    assert_eq!(ApplicationStatus::iter().count(), ApplicationStatus::ALL.len());
    for status in ApplicationStatus::iter() {
      assert_eq!(status.to_string(), status.as_str());
    }
  }

  #[test]
  fn validate_rejects_inverted_salary_range() {
    let mut input = NewApplication::new("Google", "SRE", date(2026, 1, 2));
    input.salary_min = Some(200_000);
    input.salary_max = Some(150_000);
    assert!(matches!(input.validate(), Err(Error::Validation(_))));

    input.salary_max = Some(200_000);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn validate_rejects_blank_company() {
    let input = NewApplication::new("  ", "SRE", date(2026, 1, 2));
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn note_line_carries_date_and_status() {
    let update = StatusUpdate {
      status:   ApplicationStatus::Rejected,
      note:     Some(" no callback ".into()),
      noted_on: date(2026, 3, 4),
    };
    assert_eq!(update.note_line().as_deref(), Some("[2026-03-04] rejected: no callback"));

    let silent = StatusUpdate { note: Some("   ".into()), ..update };
    assert_eq!(silent.note_line(), None);
  }

  #[test]
  fn append_note_keeps_history() {
    assert_eq!(append_note(None, "a"), "a");
    assert_eq!(append_note(Some(String::new()), "a"), "a");
    assert_eq!(append_note(Some("a".into()), "b"), "a\nb");
  }
}
