//! Error type for `customers-store-sqlite`.

use customers_core::customer::CustomerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The UNIQUE index on `customers.email` rejected a write.
  #[error("email already in use: {0}")]
  DuplicateEmail(String),

  /// A full-row rewrite matched no row.
  #[error("customer row not found: {0}")]
  MissingRow(CustomerId),

  /// The row exists but its version moved on since it was read.
  #[error("customer row {0} was rewritten concurrently")]
  Stale(CustomerId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for customers_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateEmail(email) => Self::AlreadyExists(email),
      Error::MissingRow(id) => Self::NotFound(id),
      Error::Stale(id) => Self::Conflict(id),
      other => Self::Store(Box::new(other)),
    }
  }
}
