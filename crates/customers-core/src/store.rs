//! The `CustomerStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `customers-store-sqlite`). The lifecycle service depends on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::customer::{Customer, CustomerId};

/// Abstraction over a customer persistence backend.
///
/// Backend errors must convert into [`crate::Error`]: a violated email
/// uniqueness constraint becomes [`crate::Error::AlreadyExists`], a rewrite of
/// a row that no longer exists becomes [`crate::Error::NotFound`], a rewrite
/// from a stale [`Customer::version`] becomes [`crate::Error::Conflict`], and
/// every other failure becomes [`crate::Error::Store`]. That keeps connectivity
/// faults distinguishable from "not found".
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CustomerStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// Whether any customer, active or not, already uses `email`.
  fn exists_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a customer by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: CustomerId,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Every customer, in ascending id (insertion) order.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Insert `customer` when it has no id, assigning one; otherwise rewrite
  /// the full row, but only if the stored row is still at
  /// `customer.version`. Returns the stored record with its new version.
  fn save(
    &self,
    customer: Customer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;
}
