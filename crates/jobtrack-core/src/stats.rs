//! Aggregate statistics over the applications table.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Duration, NaiveDate};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result, application::ApplicationStatus};

// ─── Date ranges ─────────────────────────────────────────────────────────────

/// An inclusive range on `applied_date`. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

impl DateRange {
  pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
    if let (Some(f), Some(t)) = (from, to)
      && f > t
    {
      return Err(Error::validation(format!(
        "date_from ({f}) is after date_to ({t})"
      )));
    }
    Ok(Self { from, to })
  }

  pub fn is_unbounded(&self) -> bool { self.from.is_none() && self.to.is_none() }
}

// ─── Windows ─────────────────────────────────────────────────────────────────

/// Named reporting windows accepted by the statistics tool.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatsWindow {
  #[default]
  #[strum(to_string = "all", serialize = "all_time")]
  All,
  Today,
  #[strum(to_string = "this_week", serialize = "week")]
  ThisWeek,
  #[strum(to_string = "this_month", serialize = "month")]
  ThisMonth,
  #[strum(to_string = "last_30_days", serialize = "30d")]
  Last30Days,
  #[strum(to_string = "this_year", serialize = "year")]
  ThisYear,
}

impl StatsWindow {
  /// Resolve the window against `today`. `All` has no bounds.
  pub fn range(self, today: NaiveDate) -> DateRange {
    let from = match self {
      Self::All => return DateRange::default(),
      Self::Today => today,
      Self::ThisWeek => {
        today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
      }
      Self::ThisMonth => today.with_day(1).unwrap_or(today),
      Self::Last30Days => today - Duration::days(29),
      Self::ThisYear => today.with_ordinal(1).unwrap_or(today),
    };
    DateRange { from: Some(from), to: Some(today) }
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Counts computed by [`crate::store::TrackerStore::application_stats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationStats {
  pub range:          DateRange,
  pub total:          u64,
  /// Only statuses with at least one application appear.
  pub by_status:      BTreeMap<ApplicationStatus, u64>,
  /// Most-applied companies, highest count first, at most five.
  pub top_companies:  Vec<(String, u64)>,
  /// Keyed by resume name; `None` counts applications with no resume linked.
  pub by_resume:      Vec<(Option<String>, u64)>,
}

impl ApplicationStats {
  pub fn count(&self, status: ApplicationStatus) -> u64 {
    self.by_status.get(&status).copied().unwrap_or(0)
  }
}
