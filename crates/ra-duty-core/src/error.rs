//! Error types for `ra-duty-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is missing, empty, or malformed.
  #[error("{0}")]
  Validation(String),

  #[error("RA not found: {0}")]
  RaNotFound(i64),

  #[error("duty not found: {0}")]
  DutyNotFound(i64),

  #[error("an RA named {0:?} already exists")]
  DuplicateRaName(String),

  #[error("cannot delete RA {id}: has associated duties ({duties})")]
  RaHasDuties { id: i64, duties: u32 },
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Implemented by storage backend error types so that callers can recover the
/// domain-level cause of a failure without depending on the backend crate.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error behind this failure, if there is one. `None` means an
  /// infrastructure failure (I/O, corrupt row, closed connection).
  fn domain(&self) -> Option<&Error>;
}

impl StoreError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}
