//! The customer entity and the inputs accepted by lifecycle operations.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned surrogate key. Never reused and never mutated.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl From<i64> for CustomerId {
  fn from(value: i64) -> Self { Self(value) }
}

// ─── Customer ────────────────────────────────────────────────────────────────

/// A customer record.
///
/// `id` is `None` until the store persists the record. Equality is surrogate
/// key equality: two customers are equal only when both carry the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
  pub id:        Option<CustomerId>,
  pub full_name: String,
  /// Unique across all customers; immutable after creation.
  pub email:     String,
  pub phone:     Option<String>,
  pub is_active: bool,
  /// Epoch seconds; set once at creation.
  pub created:   i64,
  /// Epoch seconds; bumped on every mutation.
  pub updated:   i64,
  /// Row version the record was read at. A rewrite only lands when the
  /// stored row still carries it; the store bumps it on every write.
  #[serde(default)]
  pub version:   i64,
}

impl Customer {
  /// Build an unpersisted, active customer stamped with `now`.
  pub fn from_new(input: NewCustomer, now: i64) -> Self {
    Self {
      id:        None,
      full_name: input.full_name,
      email:     input.email,
      phone:     input.phone,
      is_active: true,
      created:   now,
      updated:   now,
      version:   0,
    }
  }

  pub fn is_persisted(&self) -> bool { self.id.is_some() }
}

impl PartialEq for Customer {
  fn eq(&self, other: &Self) -> bool {
    matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::service::CustomerService::create`].
///
/// Lifecycle fields (`id`, `is_active`, timestamps) are never accepted from
/// callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
  pub full_name: String,
  pub email:     String,
  pub phone:     Option<String>,
}

/// Input to [`crate::service::CustomerService::update`]. Email is immutable,
/// so it has no place here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
  pub full_name: String,
  /// Replaces the stored phone; `None` clears it.
  pub phone:     Option<String>,
}
