//! [`SqliteStore`] — the SQLite implementation of [`TrackerStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use jobtrack_core::{
  application::{Application, NewApplication, StatusChange, StatusUpdate, append_note},
  resume::{NewResumeVersion, ResumeSummary, ResumeVersion},
  stats::{ApplicationStats, DateRange},
  store::{ApplicationQuery, TrackerStore},
};

use crate::{
  Error, Result,
  encode::{
    APPLICATION_COLUMNS, RESUME_COLUMNS, RawApplication, RawResume,
    RawResumeSummary, decode_status, encode_date, encode_dt, like_pattern,
  },
  schema::SCHEMA,
};

// ─── Connection strings ──────────────────────────────────────────────────────

/// Where a store lives, parsed from a `database_url` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
  Memory,
  File(PathBuf),
}

impl DatabaseLocation {
  /// Accepts `sqlite://<path>`, `sqlite:<path>`, `:memory:` or a bare path.
  pub fn parse(url: &str) -> Result<Self> {
    let trimmed = url.trim();
    let rest = trimmed
      .strip_prefix("sqlite://")
      .or_else(|| trimmed.strip_prefix("sqlite:"))
      .unwrap_or(trimmed);

    if rest.is_empty() || (rest.contains("://") && !trimmed.starts_with("sqlite:")) {
      return Err(Error::UnsupportedUrl(url.to_owned()));
    }
    if rest == ":memory:" {
      return Ok(Self::Memory);
    }
    // Drop any `?mode=rwc`-style query suffix.
    let path = rest.split('?').next().unwrap_or(rest);
    Ok(Self::File(PathBuf::from(path)))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracker store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open the store described by `location` and run schema initialisation.
  pub async fn connect(location: &DatabaseLocation) -> Result<Self> {
    match location {
      DatabaseLocation::Memory => Self::open_in_memory().await,
      DatabaseLocation::File(path) => Self::open(path).await,
    }
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create any missing tables and indexes. Safe to call repeatedly.
  pub async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The `PRAGMA user_version` stamped by the schema.
  pub async fn schema_version(&self) -> Result<i64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
        .await?,
    )
  }
}

/// Read one application row by id inside an open connection or transaction.
fn select_application(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawApplication>> {
  conn
    .query_row(
      &format!(
        "SELECT {APPLICATION_COLUMNS}
         FROM job_applications a
         LEFT JOIN resume_versions r ON r.id = a.resume_version_id
         WHERE a.id = ?1"
      ),
      rusqlite::params![id],
      RawApplication::from_row,
    )
    .optional()
}

fn select_resume(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<Option<RawResume>> {
  conn
    .query_row(
      &format!("SELECT {RESUME_COLUMNS} FROM resume_versions WHERE name = ?1"),
      rusqlite::params![name],
      RawResume::from_row,
    )
    .optional()
}

// ─── TrackerStore impl ───────────────────────────────────────────────────────

impl TrackerStore for SqliteStore {
  type Error = Error;

  // ── Applications ──────────────────────────────────────────────────────────

  async fn add_application(&self, input: NewApplication) -> Result<Application> {
    input.validate()?;

    let now_str     = encode_dt(Utc::now());
    let applied_str = encode_date(input.applied_date);
    let followup    = input.next_followup_date.map(encode_date);
    let resume_name = input.resume_version.clone();

    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let resume_id: Option<i64> = match &input.resume_version {
          Some(name) => {
            let id = tx
              .query_row(
                "SELECT id FROM resume_versions WHERE name = ?1",
                rusqlite::params![name],
                |r| r.get(0),
              )
              .optional()?;
            if id.is_none() {
              return Ok(None);
            }
            id
          }
          None => tx
            .query_row(
              "SELECT id FROM resume_versions WHERE is_default = 1",
              [],
              |r| r.get(0),
            )
            .optional()?,
        };

        tx.execute(
          "INSERT INTO job_applications (
             company, position, status, applied_date, source,
             salary_min, salary_max, job_url, location,
             recruiter_name, recruiter_email, next_followup_date,
             resume_version_id, notes, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
          rusqlite::params![
            input.company,
            input.position,
            input.status.as_str(),
            applied_str,
            input.source,
            input.salary_min,
            input.salary_max,
            input.job_url,
            input.location,
            input.recruiter_name,
            input.recruiter_email,
            followup,
            resume_id,
            input.notes,
            now_str,
          ],
        )?;

        let raw = select_application(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_application(),
      None => Err(
        jobtrack_core::Error::ResumeNotFound(resume_name.unwrap_or_default()).into(),
      ),
    }
  }

  async fn get_application(&self, id: i64) -> Result<Option<Application>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_application(conn, id)?))
      .await?;

    raw.map(RawApplication::into_application).transpose()
  }

  async fn get_applications(&self, query: &ApplicationQuery) -> Result<Vec<Application>> {
    let status_str   = query.status.map(|s| s.as_str().to_owned());
    let company_pat  = query.company.as_deref().map(like_pattern);
    let position_pat = query.position.as_deref().map(like_pattern);
    let from_str     = query.applied.from.map(encode_date);
    let to_str       = query.applied.to.map(encode_date);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val    = query.limit.map_or(-1, |l| l as i64);

    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {APPLICATION_COLUMNS}
           FROM job_applications a
           LEFT JOIN resume_versions r ON r.id = a.resume_version_id
           WHERE (?1 IS NULL OR a.status = ?1)
             AND (?2 IS NULL OR a.company  LIKE ?2 ESCAPE '\\')
             AND (?3 IS NULL OR a.position LIKE ?3 ESCAPE '\\')
             AND (?4 IS NULL OR a.applied_date >= ?4)
             AND (?5 IS NULL OR a.applied_date <= ?5)
           ORDER BY a.applied_date DESC, a.id DESC
           LIMIT ?6"
        ))?;

        let rows = stmt
          .query_map(
            rusqlite::params![
              status_str,
              company_pat,
              position_pat,
              from_str,
              to_str,
              limit_val,
            ],
            RawApplication::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawApplication::into_application).collect()
  }

  async fn update_application_status(
    &self,
    id:     i64,
    update: StatusUpdate,
  ) -> Result<StatusChange> {
    let now_str    = encode_dt(Utc::now());
    let status_str = update.status.as_str();
    let note_line  = update.note_line();

    let outcome: Option<(String, RawApplication)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<(String, Option<String>)> = tx
          .query_row(
            "SELECT status, notes FROM job_applications WHERE id = ?1",
            rusqlite::params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        let Some((previous, notes)) = current else {
          return Ok(None);
        };

        let notes = match note_line {
          Some(line) => Some(append_note(notes, &line)),
          None => notes,
        };

        tx.execute(
          "UPDATE job_applications
           SET status = ?1, notes = ?2, updated_at = ?3
           WHERE id = ?4",
          rusqlite::params![status_str, notes, now_str, id],
        )?;

        let raw = select_application(&tx, id)?;
        tx.commit()?;
        Ok(raw.map(|raw| (previous, raw)))
      })
      .await?;

    let (previous, raw) =
      outcome.ok_or(jobtrack_core::Error::ApplicationNotFound(id))?;

    Ok(StatusChange {
      previous:    decode_status(&previous)?,
      application: raw.into_application()?,
    })
  }

  // ── Resumes ───────────────────────────────────────────────────────────────

  async fn add_resume_version(&self, input: NewResumeVersion) -> Result<ResumeVersion> {
    input.validate()?;

    let name    = input.name.clone();
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawResume> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if select_resume(&tx, &input.name)?.is_some() {
          return Ok(None);
        }

        if input.is_default {
          tx.execute(
            "UPDATE resume_versions SET is_default = 0, updated_at = ?1
             WHERE is_default = 1",
            rusqlite::params![now_str],
          )?;
        }

        tx.execute(
          "INSERT INTO resume_versions
             (name, content, description, is_default, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![
            input.name,
            input.content,
            input.description,
            input.is_default,
            now_str,
          ],
        )?;

        let raw = select_resume(&tx, &input.name)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_resume(),
      None => Err(jobtrack_core::Error::ResumeExists(name).into()),
    }
  }

  async fn set_default_resume(&self, name: String) -> Result<ResumeVersion> {
    let now_str = encode_dt(Utc::now());
    let lookup  = name.clone();

    let raw: Option<RawResume> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(target) = select_resume(&tx, &lookup)? else {
          return Ok(None);
        };

        // Clear first: the partial unique index forbids two flagged rows even
        // momentarily.
        tx.execute(
          "UPDATE resume_versions SET is_default = 0, updated_at = ?1
           WHERE is_default = 1 AND id != ?2",
          rusqlite::params![now_str, target.id],
        )?;
        if !target.is_default {
          tx.execute(
            "UPDATE resume_versions SET is_default = 1, updated_at = ?1
             WHERE id = ?2",
            rusqlite::params![now_str, target.id],
          )?;
        }

        let raw = select_resume(&tx, &lookup)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    match raw {
      Some(raw) => raw.into_resume(),
      None => Err(jobtrack_core::Error::ResumeNotFound(name).into()),
    }
  }

  async fn get_resume(&self, name: String) -> Result<Option<ResumeVersion>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_resume(conn, &name)?))
      .await?;

    raw.map(RawResume::into_resume).transpose()
  }

  async fn list_resumes(&self) -> Result<Vec<ResumeSummary>> {
    let raws: Vec<RawResumeSummary> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, description, is_default, updated_at
           FROM resume_versions
           ORDER BY name ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawResumeSummary {
              name:        row.get(0)?,
              description: row.get(1)?,
              is_default:  row.get(2)?,
              updated_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResumeSummary::into_summary).collect()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn application_stats(&self, range: DateRange) -> Result<ApplicationStats> {
    let from_str = range.from.map(encode_date);
    let to_str   = range.to.map(encode_date);

    type Counts<K> = Vec<(K, i64)>;

    let (by_status, top_companies, by_resume): (
      Counts<String>,
      Counts<String>,
      Counts<Option<String>>,
    ) = self
      .conn
      .call(move |conn| {
        // One read transaction so the three groupings see the same snapshot.
        let tx = conn.transaction()?;
        let params = rusqlite::params![from_str, to_str];
        const WINDOW: &str = "(?1 IS NULL OR a.applied_date >= ?1)
                          AND (?2 IS NULL OR a.applied_date <= ?2)";

        let by_status = tx
          .prepare(&format!(
            "SELECT a.status, COUNT(*) FROM job_applications a
             WHERE {WINDOW}
             GROUP BY a.status"
          ))?
          .query_map(params, |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let top_companies = tx
          .prepare(&format!(
            "SELECT MIN(a.company), COUNT(*) AS n FROM job_applications a
             WHERE {WINDOW}
             GROUP BY a.company COLLATE NOCASE
             ORDER BY n DESC, MIN(a.company) ASC
             LIMIT 5"
          ))?
          .query_map(params, |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let by_resume = tx
          .prepare(&format!(
            "SELECT r.name, COUNT(*) FROM job_applications a
             LEFT JOIN resume_versions r ON r.id = a.resume_version_id
             WHERE {WINDOW}
             GROUP BY r.name
             ORDER BY r.name ASC"
          ))?
          .query_map(params, |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        tx.commit()?;
        Ok((by_status, top_companies, by_resume))
      })
      .await?;

    let mut stats = ApplicationStats { range, ..Default::default() };
    for (status, count) in by_status {
      let count = count as u64;
      stats.total += count;
      stats.by_status.insert(decode_status(&status)?, count);
    }
    stats.top_companies = top_companies
      .into_iter()
      .map(|(company, n)| (company, n as u64))
      .collect();
    stats.by_resume = by_resume
      .into_iter()
      .map(|(name, n)| (name, n as u64))
      .collect();

    Ok(stats)
  }
}
