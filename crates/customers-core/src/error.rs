//! Error types for `customers-core`.
//!
//! [`Error`] is the domain error taxonomy. Every variant classifies into an
//! [`ErrorKind`]; translating a kind into a wire status is the transport
//! layer's job, not this crate's.

use std::fmt;

use thiserror::Error;

use crate::customer::CustomerId;

// ─── Field violations ────────────────────────────────────────────────────────

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  /// Wire name of the offending field, e.g. `"fullName"`.
  pub field:   &'static str,
  pub message: &'static str,
}

/// Every rule that failed for one input, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
  pub fn push(&mut self, field: &'static str, message: &'static str) {
    self.0.push(FieldError { field, message });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

  /// `Ok(())` when nothing failed, otherwise the collected violations.
  pub fn into_result(self) -> Result<()> {
    if self.is_empty() { Ok(()) } else { Err(Error::Validation(self)) }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, e) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  Validation(ValidationErrors),

  #[error("Customer with `Id: {0}` was not found!")]
  NotFound(CustomerId),

  #[error("Customer with 'Email: {0}' already exists!")]
  AlreadyExists(String),

  #[error("Customer with `Id: {0}` is already inactive")]
  FieldUnchanged(CustomerId),

  /// The row changed between read and rewrite. The lifecycle service
  /// re-reads and retries; it only escapes from a direct store call.
  #[error("Customer with `Id: {0}` was modified concurrently")]
  Conflict(CustomerId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The coarse classification the transport layer maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  ValidationFailed,
  NotFound,
  AlreadyExists,
  FieldUnchanged,
  Unexpected,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::ValidationFailed,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
      Self::FieldUnchanged(_) => ErrorKind::FieldUnchanged,
      Self::Conflict(_) | Self::Store(_) => ErrorKind::Unexpected,
    }
  }

  /// Expected outcomes are reported to the caller, never treated as faults.
  pub fn is_expected(&self) -> bool { self.kind() != ErrorKind::Unexpected }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_name_the_offending_value() {
    assert_eq!(
      Error::NotFound(CustomerId(999)).to_string(),
      "Customer with `Id: 999` was not found!"
    );
    assert_eq!(
      Error::AlreadyExists("customer@example.com".into()).to_string(),
      "Customer with 'Email: customer@example.com' already exists!"
    );
  }

  #[test]
  fn validation_errors_join_in_order() {
    let mut errs = ValidationErrors::default();
    errs.push("fullName", "first");
    errs.push("phone", "second");
    assert_eq!(errs.to_string(), "fullName: first; phone: second");
    assert_eq!(Error::Validation(errs).kind(), ErrorKind::ValidationFailed);
  }

  #[test]
  fn store_failures_are_unexpected() {
    let err = Error::Store("disk on fire".into());
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(!err.is_expected());
    assert!(Error::FieldUnchanged(CustomerId(1)).is_expected());
    assert_eq!(Error::Conflict(CustomerId(1)).kind(), ErrorKind::Unexpected);
  }
}
