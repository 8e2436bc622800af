//! Error taxonomy shared by every layer of the tracker.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad or missing input; the message is shown to the caller verbatim.
  #[error("{0}")]
  Validation(String),

  #[error("application {0} not found")]
  ApplicationNotFound(i64),

  #[error("resume '{0}' not found")]
  ResumeNotFound(String),

  #[error("resume '{0}' already exists")]
  ResumeExists(String),

  /// Connection or transaction failure in the backing store.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
