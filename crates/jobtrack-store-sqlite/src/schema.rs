//! SQL schema for the tracker's SQLite store.
//!
//! Executed on every connection open. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// The `status` CHECK list must match `ApplicationStatus::as_str`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS resume_versions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    content     TEXT    NOT NULL,
    description TEXT,
    is_default  INTEGER NOT NULL DEFAULT 0 CHECK (is_default IN (0, 1)),
    created_at  TEXT    NOT NULL,   -- RFC 3339 UTC
    updated_at  TEXT    NOT NULL
);

-- At most one row may carry the default flag.
CREATE UNIQUE INDEX IF NOT EXISTS resume_versions_one_default
    ON resume_versions(is_default) WHERE is_default = 1;

CREATE TABLE IF NOT EXISTS job_applications (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    company            TEXT    NOT NULL CHECK (length(trim(company)) > 0),
    position           TEXT    NOT NULL CHECK (length(trim(position)) > 0),
    status             TEXT    NOT NULL DEFAULT 'applied'
                       CHECK (status IN ('applied', 'interviewing', 'offered',
                                         'rejected', 'withdrawn', 'hired')),
    applied_date       TEXT    NOT NULL,   -- YYYY-MM-DD
    source             TEXT,
    salary_min         INTEGER,
    salary_max         INTEGER,
    job_url            TEXT,
    location           TEXT,
    recruiter_name     TEXT,
    recruiter_email    TEXT,
    next_followup_date TEXT,
    resume_version_id  INTEGER REFERENCES resume_versions(id),
    notes              TEXT,
    created_at         TEXT    NOT NULL,
    updated_at         TEXT    NOT NULL,
    CHECK (salary_min IS NULL OR salary_max IS NULL OR salary_min <= salary_max)
);

CREATE INDEX IF NOT EXISTS job_applications_status_idx  ON job_applications(status);
CREATE INDEX IF NOT EXISTS job_applications_applied_idx ON job_applications(applied_date);
CREATE INDEX IF NOT EXISTS job_applications_company_idx ON job_applications(company);

PRAGMA user_version = 1;
";
