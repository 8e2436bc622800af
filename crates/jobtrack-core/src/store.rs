//! The `TrackerStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `jobtrack-store-sqlite`).
//! The tool dispatcher depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  application::{Application, ApplicationStatus, NewApplication, StatusChange, StatusUpdate},
  resume::{NewResumeVersion, ResumeSummary, ResumeVersion},
  stats::{ApplicationStats, DateRange},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`TrackerStore::get_applications`]. An empty query matches
/// every application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationQuery {
  pub status:   Option<ApplicationStatus>,
  /// Case-insensitive substring of the company name.
  pub company:  Option<String>,
  /// Case-insensitive substring of the position title.
  pub position: Option<String>,
  /// Inclusive bounds on `applied_date`.
  pub applied:  DateRange,
  pub limit:    Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a tracker store backend.
///
/// Every write runs as one atomic transaction. Backends hold no cached state
/// between calls; each read reflects the store at call time.
///
/// Backend errors must convert into the shared [`crate::Error`] taxonomy so
/// callers can tell "not found" from "store unavailable" without knowing the
/// backend.
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Applications ──────────────────────────────────────────────────────

  /// Persist a new application and return it with its assigned id.
  ///
  /// Links `input.resume_version` by name, or the current default resume when
  /// no name is given. A named resume that does not exist is an error.
  fn add_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Retrieve an application by id. Returns `None` if not found.
  fn get_application(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// Applications matching `query`, most recent `applied_date` first.
  fn get_applications<'a>(
    &'a self,
    query: &'a ApplicationQuery,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + 'a;

  /// Change an application's status, appending the update's note line.
  fn update_application_status(
    &self,
    id: i64,
    update: StatusUpdate,
  ) -> impl Future<Output = Result<StatusChange, Self::Error>> + Send + '_;

  // ── Resumes ───────────────────────────────────────────────────────────

  /// Persist a new resume version. Fails if the name is taken.
  fn add_resume_version(
    &self,
    input: NewResumeVersion,
  ) -> impl Future<Output = Result<ResumeVersion, Self::Error>> + Send + '_;

  /// Make `name` the only default resume.
  fn set_default_resume(
    &self,
    name: String,
  ) -> impl Future<Output = Result<ResumeVersion, Self::Error>> + Send + '_;

  /// Retrieve a resume version by name. Returns `None` if not found.
  fn get_resume(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<ResumeVersion>, Self::Error>> + Send + '_;

  /// All resume versions, name ascending.
  fn list_resumes(
    &self,
  ) -> impl Future<Output = Result<Vec<ResumeSummary>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Grouped counts over applications whose `applied_date` lies in `range`.
  fn application_stats(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<ApplicationStats, Self::Error>> + Send + '_;
}
