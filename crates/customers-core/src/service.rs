//! [`CustomerService`]: the customer lifecycle.
//!
//! Every operation validates its input before touching the store. Mutating
//! operations hold the service's write gate for their whole duration, so the
//! existence check, the field mutation, the timestamp, and the save commit as
//! one unit relative to every other mutation of this service.
//!
//! Other writers on the same store (another service, another process) are
//! caught by the store itself: the UNIQUE email constraint for creates, and
//! the row version for rewrites. A rewrite that loses the version race fails
//! with [`Error::Conflict`]; update and deactivate then re-read the row and
//! decide again, so a deactivation racing another one reports
//! [`Error::FieldUnchanged`].

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
  Error, Result,
  customer::{Customer, CustomerId, CustomerUpdate, NewCustomer},
  store::CustomerStore,
  validate,
};

/// Source of the current time in epoch seconds.
pub type Clock = fn() -> i64;

fn system_clock() -> i64 { Utc::now().timestamp() }

/// Orchestrates create, read, update, and deactivate over a
/// [`CustomerStore`].
pub struct CustomerService<S> {
  store:      S,
  clock:      Clock,
  write_gate: Mutex<()>,
}

impl<S: CustomerStore> CustomerService<S> {
  pub fn new(store: S) -> Self { Self::with_clock(store, system_clock) }

  /// Use `clock` instead of the system clock for timestamps.
  pub fn with_clock(store: S, clock: Clock) -> Self {
    Self { store, clock, write_gate: Mutex::new(()) }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Validate and persist a new, active customer.
  ///
  /// Fails with [`Error::AlreadyExists`] when the email is taken, without
  /// calling [`CustomerStore::save`].
  pub async fn create(&self, input: NewCustomer) -> Result<Customer> {
    validate::new_customer(&input)?;

    let _gate = self.write_gate.lock().await;

    if self
      .store
      .exists_by_email(&input.email)
      .await
      .map_err(Into::<Error>::into)?
    {
      return Err(Error::AlreadyExists(input.email));
    }

    let customer = Customer::from_new(input, (self.clock)());
    let saved = self.store.save(customer).await.map_err(Into::<Error>::into)?;

    if let Some(id) = saved.id {
      tracing::info!(%id, "customer created");
    }
    Ok(saved)
  }

  pub async fn get_by_id(&self, id: CustomerId) -> Result<Customer> {
    tracing::debug!(%id, "fetching customer");
    self
      .store
      .find_by_id(id)
      .await
      .map_err(Into::<Error>::into)?
      .ok_or(Error::NotFound(id))
  }

  pub async fn get_all(&self) -> Result<Vec<Customer>> {
    self.store.find_all().await.map_err(Into::into)
  }

  /// Overwrite `full_name` and `phone`. Email, activity, and the creation
  /// timestamp are left untouched.
  pub async fn update(
    &self,
    id: CustomerId,
    input: CustomerUpdate,
  ) -> Result<Customer> {
    validate::customer_update(&input)?;

    let _gate = self.write_gate.lock().await;

    loop {
      let mut customer = self.get_by_id(id).await?;
      customer.full_name = input.full_name.clone();
      customer.phone = input.phone.clone();
      // `updated` never moves backwards, even if the clock does.
      customer.updated = customer.updated.max((self.clock)());

      match self.store.save(customer).await.map_err(Into::<Error>::into) {
        Ok(saved) => {
          tracing::info!(%id, "customer updated");
          return Ok(saved);
        }
        Err(Error::Conflict(_)) => {
          tracing::debug!(%id, "customer changed during update, retrying");
        }
        Err(e) => return Err(e),
      }
    }
  }

  /// Soft-delete: flip `is_active` to `false`. No row is ever removed.
  ///
  /// Fails with [`Error::FieldUnchanged`] when the customer is already
  /// inactive.
  pub async fn deactivate(&self, id: CustomerId) -> Result<Customer> {
    let _gate = self.write_gate.lock().await;

    loop {
      let mut customer = self.get_by_id(id).await?;
      if !customer.is_active {
        return Err(Error::FieldUnchanged(id));
      }
      customer.is_active = false;
      customer.updated = customer.updated.max((self.clock)());

      match self.store.save(customer).await.map_err(Into::<Error>::into) {
        Ok(saved) => {
          tracing::info!(%id, "customer deactivated");
          return Ok(saved);
        }
        // Someone else wrote the row first; re-read to see whether it is
        // still active.
        Err(Error::Conflict(_)) => {
          tracing::debug!(%id, "customer changed during deactivation, re-reading");
        }
        Err(e) => return Err(e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    ErrorKind,
    testing::{MemoryStore, customer_update, new_customer},
    validate::{FULL_NAME_LENGTH_MESSAGE, PHONE_FORMAT_MESSAGE},
  };

  fn service() -> CustomerService<MemoryStore> {
    CustomerService::new(MemoryStore::default())
  }

  fn early_clock() -> i64 { 1_000 }

  fn late_clock() -> i64 { 2_000 }

  fn id_of(c: &Customer) -> CustomerId { c.id.expect("persisted customer") }

  // ─── Create ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_returns_same_record() {
    let svc = service();
    let created = svc.create(new_customer(1)).await.unwrap();
    assert!(created.is_active);
    assert_eq!(created.created, created.updated);

    let fetched = svc.get_by_id(id_of(&created)).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.full_name, created.full_name);
    assert_eq!(fetched.email, created.email);
    assert_eq!(fetched.phone, created.phone);
    assert_eq!(fetched.created, created.created);
  }

  #[tokio::test]
  async fn create_assigns_distinct_ids() {
    let svc = service();
    let a = svc.create(new_customer(1)).await.unwrap();
    let b = svc.create(new_customer(2)).await.unwrap();
    assert_ne!(a.id, b.id);
  }

  #[tokio::test]
  async fn create_with_taken_email_never_saves() {
    let svc = service();
    let first = svc.create(new_customer(1)).await.unwrap();
    assert_eq!(svc.store().saves(), 1);

    let dup = NewCustomer { email: first.email.clone(), ..new_customer(2) };
    let err = svc.create(dup).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(err.to_string().contains(&first.email));
    assert_eq!(svc.store().saves(), 1);

    let all = svc.get_all().await.unwrap();
    assert_eq!(all.iter().filter(|c| c.email == first.email).count(), 1);
  }

  #[tokio::test]
  async fn create_with_email_of_inactive_customer_still_conflicts() {
    let svc = service();
    let first = svc.create(new_customer(1)).await.unwrap();
    svc.deactivate(id_of(&first)).await.unwrap();

    let dup = NewCustomer { email: first.email.clone(), ..new_customer(2) };
    let err = svc.create(dup).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
  }

  #[tokio::test]
  async fn create_rejects_invalid_input_before_touching_store() {
    let svc = service();
    let input = NewCustomer { phone: Some("invalid_phone".into()), ..new_customer(1) };
    let err = svc.create(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(err.to_string().contains(PHONE_FORMAT_MESSAGE));
    assert_eq!(svc.store().saves(), 0);
  }

  #[tokio::test]
  async fn store_failure_is_unexpected() {
    let svc = service();
    svc.store().set_failing(true);
    let err = svc.create(new_customer(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
  }

  // ─── Read ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_missing_is_not_found() {
    let err = service().get_by_id(CustomerId(999)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Customer with `Id: 999` was not found!");
  }

  #[tokio::test]
  async fn get_all_is_in_insertion_order_and_stable() {
    let svc = service();
    for seed in 0..5 {
      svc.create(new_customer(seed)).await.unwrap();
    }
    let first: Vec<_> = svc.get_all().await.unwrap().iter().map(id_of).collect();
    let again: Vec<_> = svc.get_all().await.unwrap().iter().map(id_of).collect();
    assert_eq!(first.len(), 5);
    assert!(first.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(first, again);
  }

  // ─── Update ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_touches_only_name_phone_and_updated() {
    let store = MemoryStore::default();
    let svc = CustomerService::with_clock(store.clone(), early_clock);
    let created = svc.create(new_customer(1)).await.unwrap();

    let later = CustomerService::with_clock(store, late_clock);
    let input = customer_update(7);
    let updated = later.update(id_of(&created), input.clone()).await.unwrap();

    assert_eq!(updated.full_name, input.full_name);
    assert_eq!(updated.phone, input.phone);
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.is_active, created.is_active);
    assert_eq!(updated.created, early_clock());
    assert_eq!(updated.updated, late_clock());
  }

  #[tokio::test]
  async fn update_never_moves_updated_backwards() {
    let store = MemoryStore::default();
    let svc = CustomerService::with_clock(store.clone(), late_clock);
    let created = svc.create(new_customer(1)).await.unwrap();

    let skewed = CustomerService::with_clock(store, early_clock);
    let updated = skewed.update(id_of(&created), customer_update(2)).await.unwrap();
    assert_eq!(updated.updated, late_clock());
  }

  #[tokio::test]
  async fn update_with_no_phone_clears_it() {
    let svc = service();
    let created = svc.create(new_customer(1)).await.unwrap();
    assert!(created.phone.is_some());

    let input = CustomerUpdate { phone: None, ..customer_update(1) };
    let updated = svc.update(id_of(&created), input).await.unwrap();
    assert_eq!(updated.phone, None);
  }

  #[tokio::test]
  async fn update_missing_is_not_found_and_saves_nothing() {
    let svc = service();
    let err = svc.update(CustomerId(42), customer_update(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(svc.store().saves(), 0);
  }

  #[tokio::test]
  async fn update_validates_input() {
    let svc = service();
    let created = svc.create(new_customer(1)).await.unwrap();
    let input = CustomerUpdate { full_name: "x".into(), phone: None };
    let err = svc.update(id_of(&created), input).await.unwrap_err();
    assert!(err.to_string().contains(FULL_NAME_LENGTH_MESSAGE));
    assert_eq!(svc.store().saves(), 1);
  }

  // ─── Deactivate ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn deactivate_succeeds_once() {
    let svc = service();
    let id = id_of(&svc.create(new_customer(1)).await.unwrap());

    let deactivated = svc.deactivate(id).await.unwrap();
    assert!(!deactivated.is_active);
    assert!(!svc.get_by_id(id).await.unwrap().is_active);

    let err = svc.deactivate(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldUnchanged);
    assert!(!svc.get_by_id(id).await.unwrap().is_active);
    assert_eq!(svc.get_all().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn deactivate_keeps_identity_fields() {
    let svc = service();
    let created = svc.create(new_customer(3)).await.unwrap();
    let deactivated = svc.deactivate(id_of(&created)).await.unwrap();
    assert_eq!(deactivated.email, created.email);
    assert_eq!(deactivated.full_name, created.full_name);
    assert_eq!(deactivated.created, created.created);
    assert!(deactivated.updated >= created.updated);
  }

  #[tokio::test]
  async fn deactivate_missing_is_not_found() {
    let svc = service();
    let err = svc.deactivate(CustomerId(5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(svc.store().saves(), 0);
  }
}
