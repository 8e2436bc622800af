//! Error type for `jobtrack-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] jobtrack_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown application status in store: {0:?}")]
  UnknownStatus(String),

  #[error("unsupported database url {0:?}: expected sqlite://<path>, a file path, or :memory:")]
  UnsupportedUrl(String),
}

impl From<Error> for jobtrack_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      other => jobtrack_core::Error::StoreUnavailable(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
