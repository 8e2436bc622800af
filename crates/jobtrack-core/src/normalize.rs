//! Normalisation of free-form input into canonical values.
//!
//! Everything here is pure: the current date is always passed in explicitly,
//! so the rules can be tested without a clock or a store.

use chrono::{Duration, NaiveDate};

use crate::{
  Error, Result,
  application::ApplicationStatus,
  stats::StatsWindow,
};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse `today`, `yesterday`, `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
  let trimmed = input.trim();
  match trimmed.to_ascii_lowercase().as_str() {
    "today" => return Ok(today),
    "yesterday" => return Ok(today - Duration::days(1)),
    _ => {}
  }

  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    .ok_or_else(|| {
      Error::validation(format!(
        "invalid date {trimmed:?}: expected YYYY-MM-DD, MM/DD/YYYY, today or yesterday"
      ))
    })
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn parse_status(input: &str) -> Result<ApplicationStatus> {
  input.trim().parse().map_err(|_| {
    Error::validation(format!(
      "invalid status {:?}: expected one of {}",
      input.trim(),
      ApplicationStatus::allowed_values()
    ))
  })
}

pub fn parse_window(input: &str) -> Result<StatsWindow> {
  use strum::IntoEnumIterator as _;

  input.trim().parse().map_err(|_| {
    let allowed = StatsWindow::iter()
      .map(|w| w.to_string())
      .collect::<Vec<_>>()
      .join(", ");
    Error::validation(format!(
      "invalid window {:?}: expected one of {allowed}",
      input.trim()
    ))
  })
}

// ─── Salary ──────────────────────────────────────────────────────────────────

/// Parse a single salary figure such as `150000`, `150,000`, `$150k` or
/// `$1.2m` into whole currency units.
pub fn parse_salary(input: &str) -> Result<i64> {
  let invalid = || Error::validation(format!("invalid salary {:?}", input.trim()));

  let cleaned: String = input
    .trim()
    .trim_start_matches('$')
    .chars()
    .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
    .collect();

  let (digits, multiplier) = match cleaned.chars().last() {
    Some('k' | 'K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
    Some('m' | 'M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
    _ => (cleaned.as_str(), 1.0),
  };

  // Only plain decimals: `f64::from_str` would also accept "inf" or "1e5".
  let dots = digits.chars().filter(|c| *c == '.').count();
  if digits.is_empty()
    || dots > 1
    || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    || !digits.chars().any(|c| c.is_ascii_digit())
  {
    return Err(invalid());
  }

  let value: f64 = digits.parse().map_err(|_| invalid())?;
  salary_from_number(value * multiplier)
}

/// Accept a numeric salary supplied directly (e.g. a JSON number).
pub fn salary_from_number(value: f64) -> Result<i64> {
  if !value.is_finite() || value < 0.0 || value > i64::MAX as f64 {
    return Err(Error::validation(format!("invalid salary {value}")));
  }
  Ok(value.round() as i64)
}

/// Parse a range such as `$150k - $200k`, `150,000 to 180,000`, or a single
/// figure (which sets only the lower bound).
pub fn parse_salary_range(input: &str) -> Result<(Option<i64>, Option<i64>)> {
  let lowered = input.trim().to_ascii_lowercase();
  let parts: Vec<&str> = lowered
    .split(['-', '–', '—'])
    .flat_map(|p| p.split(" to "))
    .map(str::trim)
    .collect();

  let (min, max) = match parts.as_slice() {
    [single] => (Some(parse_salary(single)?), None),
    [low, high] => (Some(parse_salary(low)?), Some(parse_salary(high)?)),
    _ => {
      return Err(Error::validation(format!(
        "invalid salary range {:?}: expected e.g. \"$150k - $200k\"",
        input.trim()
      )));
    }
  };
  check_salary_bounds(min, max)?;
  Ok((min, max))
}

pub fn check_salary_bounds(min: Option<i64>, max: Option<i64>) -> Result<()> {
  match (min, max) {
    (Some(lo), Some(hi)) if lo > hi => Err(Error::validation(format!(
      "salary_min ({lo}) must not exceed salary_max ({hi})"
    ))),
    _ => Ok(()),
  }
}

// ─── Text ────────────────────────────────────────────────────────────────────

/// Trim a required text field, rejecting blanks.
pub fn require_text(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(format!("{field} must not be empty")));
  }
  Ok(trimmed.to_owned())
}

/// Trim an optional text field; blank values become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 18).unwrap() }

  #[test]
  fn relative_dates_resolve_against_today() {
    assert_eq!(parse_date("today", today()).unwrap(), today());
    assert_eq!(parse_date(" Today ", today()).unwrap(), today());
    assert_eq!(
      parse_date("yesterday", today()).unwrap(),
      NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    );
  }

  #[test]
  fn today_and_literal_date_agree() {
    assert_eq!(
      parse_date("today", today()).unwrap(),
      parse_date("2026-10-18", today()).unwrap()
    );
  }

  #[test]
  fn us_dates_parse() {
    assert_eq!(
      parse_date("03/07/2026", today()).unwrap(),
      NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    );
  }

  #[test]
  fn garbage_dates_are_rejected() {
    for input in ["", "last tuesday", "2026-13-01", "18.10.2026"] {
      let err = parse_date(input, today()).unwrap_err();
      assert!(matches!(err, Error::Validation(_)), "{input}: {err}");
    }
  }

  #[test]
  fn unknown_status_lists_allowed_values() {
    let err = parse_status("ghosted").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("ghosted"));
    assert!(msg.contains("applied, interviewing, offered, rejected, withdrawn, hired"));
  }

  #[test]
  fn status_is_case_insensitive() {
    assert_eq!(parse_status(" REJECTED ").unwrap(), ApplicationStatus::Rejected);
  }

  #[test]
  fn salary_shorthand() {
    assert_eq!(parse_salary("$150k").unwrap(), 150_000);
    assert_eq!(parse_salary("150,000").unwrap(), 150_000);
    assert_eq!(parse_salary("150.5K").unwrap(), 150_500);
    assert_eq!(parse_salary("$1.2m").unwrap(), 1_200_000);
    assert_eq!(parse_salary("95000").unwrap(), 95_000);
  }

  #[test]
  fn malformed_salary_is_rejected() {
    for input in ["", "$", "k", "abc", "1.2.3k", "inf", "1e5", "-5"] {
      assert!(parse_salary(input).is_err(), "{input} should fail");
    }
    assert!(salary_from_number(-1.0).is_err());
    assert!(salary_from_number(f64::NAN).is_err());
  }

  #[test]
  fn salary_ranges() {
    assert_eq!(
      parse_salary_range("$150k - $200k").unwrap(),
      (Some(150_000), Some(200_000))
    );
    assert_eq!(
      parse_salary_range("120,000 to 140,000").unwrap(),
      (Some(120_000), Some(140_000))
    );
    assert_eq!(parse_salary_range("$90k").unwrap(), (Some(90_000), None));
    assert!(parse_salary_range("$200k - $150k").is_err());
    assert!(parse_salary_range("1 - 2 - 3").is_err());
  }

  #[test]
  fn windows_parse() {
    assert_eq!(parse_window("this_month").unwrap(), StatsWindow::ThisMonth);
    assert_eq!(parse_window("Month").unwrap(), StatsWindow::ThisMonth);
    assert!(parse_window("fortnight").unwrap_err().to_string().contains("last_30_days"));
  }

  #[test]
  fn text_fields_are_trimmed() {
    assert_eq!(require_text("company", "  Acme ").unwrap(), "Acme");
    assert!(require_text("company", "   ").is_err());
    assert_eq!(optional_text(Some("  ".into())), None);
    assert_eq!(optional_text(Some(" x ".into())), Some("x".into()));
  }
}
