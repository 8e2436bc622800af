//! Resume versions — named text variants of the user's resume.
//!
//! Versions are keyed by `name`. At most one version is the default at any
//! time; the store enforces this transactionally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted resume version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeVersion {
  pub id:          i64,
  /// Unique, e.g. "backend-focused".
  pub name:        String,
  pub content:     String,
  pub description: Option<String>,
  pub is_default:  bool,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// The listing view of a resume version; omits the full content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
  pub name:        String,
  pub description: Option<String>,
  pub is_default:  bool,
  pub updated_at:  DateTime<Utc>,
}

/// Input to [`crate::store::TrackerStore::add_resume_version`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewResumeVersion {
  pub name:        String,
  pub content:     String,
  pub description: Option<String>,
  /// If set, every other version loses its default flag in the same
  /// transaction.
  pub is_default:  bool,
}

impl NewResumeVersion {
  pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      name:        name.into(),
      content:     content.into(),
      description: None,
      is_default:  false,
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::validation("resume name must not be empty"));
    }
    if self.content.trim().is_empty() {
      return Err(Error::validation("resume content must not be empty"));
    }
    Ok(())
  }
}
