//! Mapping between [`Customer`] and `customers` rows.
//!
//! Timestamps are stored as INTEGER epoch seconds and `is_active` as 0/1, so
//! rusqlite's own conversions cover every column.

use customers_core::customer::{Customer, CustomerId};
use rusqlite::{ErrorCode, Row, ffi};

/// Column list shared by every SELECT; order matches [`customer_from_row`].
pub const COLUMNS: &str =
  "id, full_name, email, phone, is_active, created, updated, version";

pub fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
  Ok(Customer {
    id:        Some(CustomerId(row.get(0)?)),
    full_name: row.get(1)?,
    email:     row.get(2)?,
    phone:     row.get(3)?,
    is_active: row.get(4)?,
    created:   row.get(5)?,
    updated:   row.get(6)?,
    version:   row.get(7)?,
  })
}

/// Whether `e` is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == ErrorCode::ConstraintViolation
        && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
