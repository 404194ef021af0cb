//! Test support: a deterministic fixture factory and an in-memory store.
//!
//! Fixtures are pure functions of a seed; override individual fields with
//! struct update syntax, e.g.
//! `NewCustomer { email: "x@example.com".into(), ..new_customer(1) }`.

use std::{
  collections::BTreeMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;

use crate::{
  customer::{Customer, CustomerId, CustomerUpdate, NewCustomer},
  store::CustomerStore,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const FIRST_NAMES: [&str; 8] =
  ["Jane", "Taras", "Amara", "Kenji", "Olena", "Mateo", "Priya", "Noah"];
const LAST_NAMES: [&str; 8] =
  ["Doe", "Shevchenko", "Okafor", "Sato", "Kovalenko", "Silva", "Rao", "Berg"];

fn name_for(seed: u64) -> (&'static str, &'static str) {
  let first = FIRST_NAMES[(seed % 8) as usize];
  let last = LAST_NAMES[((seed / 8) % 8) as usize];
  (first, last)
}

fn phone_for(seed: u64) -> String { format!("+380{:09}", seed % 1_000_000_000) }

/// A valid create input. Distinct seeds yield distinct emails.
pub fn new_customer(seed: u64) -> NewCustomer {
  let (first, last) = name_for(seed);
  NewCustomer {
    full_name: format!("{first} {last}"),
    email:     format!(
      "{}.{}{seed}@example.com",
      first.to_lowercase(),
      last.to_lowercase()
    ),
    phone:     Some(phone_for(seed)),
  }
}

/// A valid update input.
pub fn customer_update(seed: u64) -> CustomerUpdate {
  let (first, last) = name_for(seed.wrapping_add(3));
  CustomerUpdate {
    full_name: format!("{first} {last}-Updated"),
    phone:     Some(phone_for(seed.wrapping_add(500))),
  }
}

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("duplicate email: {0}")]
  DuplicateEmail(String),

  #[error("no customer row with id {0}")]
  MissingRow(CustomerId),

  #[error("customer row {0} was rewritten since it was read")]
  Stale(CustomerId),

  #[error("memory store is unavailable")]
  Unavailable,
}

impl From<MemoryStoreError> for crate::Error {
  fn from(e: MemoryStoreError) -> Self {
    match e {
      MemoryStoreError::DuplicateEmail(email) => Self::AlreadyExists(email),
      MemoryStoreError::MissingRow(id) => Self::NotFound(id),
      MemoryStoreError::Stale(id) => Self::Conflict(id),
      other => Self::Store(Box::new(other)),
    }
  }
}

#[derive(Default)]
struct Inner {
  rows:    BTreeMap<CustomerId, Customer>,
  last_id: i64,
  saves:   usize,
  failing: bool,
}

/// A [`CustomerStore`] held in memory. Enforces email uniqueness and row
/// versions on save the way the SQLite store does, and counts calls to `save`.
///
/// Cloning is cheap; clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn guard(&self) -> Result<MutexGuard<'_, Inner>, MemoryStoreError> {
    let inner = self.lock();
    if inner.failing {
      return Err(MemoryStoreError::Unavailable);
    }
    Ok(inner)
  }

  /// Number of `save` calls that reached the store.
  pub fn saves(&self) -> usize { self.lock().saves }

  /// Make every subsequent call fail with [`MemoryStoreError::Unavailable`].
  pub fn set_failing(&self, failing: bool) { self.lock().failing = failing; }
}

impl CustomerStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn exists_by_email(&self, email: &str) -> Result<bool, Self::Error> {
    Ok(self.guard()?.rows.values().any(|c| c.email == email))
  }

  async fn find_by_id(
    &self,
    id: CustomerId,
  ) -> Result<Option<Customer>, Self::Error> {
    Ok(self.guard()?.rows.get(&id).cloned())
  }

  async fn find_all(&self) -> Result<Vec<Customer>, Self::Error> {
    Ok(self.guard()?.rows.values().cloned().collect())
  }

  async fn save(&self, mut customer: Customer) -> Result<Customer, Self::Error> {
    let mut inner = self.guard()?;
    inner.saves += 1;

    let clash = inner
      .rows
      .values()
      .any(|c| c.email == customer.email && c.id != customer.id);
    if clash {
      return Err(MemoryStoreError::DuplicateEmail(customer.email));
    }

    let id = match customer.id {
      Some(id) => match inner.rows.get(&id) {
        None => return Err(MemoryStoreError::MissingRow(id)),
        Some(row) if row.version != customer.version => {
          return Err(MemoryStoreError::Stale(id));
        }
        Some(_) => {
          customer.version += 1;
          id
        }
      },
      None => {
        inner.last_id += 1;
        customer.version = 0;
        CustomerId(inner.last_id)
      }
    };
    customer.id = Some(id);
    inner.rows.insert(id, customer.clone());
    Ok(customer)
  }
}
