//! [`SqliteStore`], the SQLite implementation of [`CustomerStore`].

use std::path::Path;

use customers_core::{
  customer::{Customer, CustomerId},
  store::CustomerStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{COLUMNS, customer_from_row, is_unique_violation},
  schema::{ADD_VERSION_COLUMN, SCHEMA},
};

/// Result of a write, decided inside the connection thread so that
/// constraint failures can be told apart from real database errors.
enum SaveOutcome {
  Saved { id: i64, version: i64 },
  DuplicateEmail,
  MissingRow(CustomerId),
  Stale(CustomerId),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A customer store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening customer store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        let versioned = conn
          .prepare(
            "SELECT 1 FROM pragma_table_info('customers') WHERE name = 'version'",
          )?
          .exists([])?;
        if !versioned {
          conn.execute_batch(ADD_VERSION_COLUMN)?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run one INSERT or UPDATE inside its own transaction.
  ///
  /// An UPDATE only matches the row while it is still at the version the
  /// caller read; a miss is then told apart as a stale read or a missing row.
  async fn write(&self, customer: &Customer) -> Result<SaveOutcome> {
    let id        = customer.id.map(|id| id.0);
    let full_name = customer.full_name.clone();
    let email     = customer.email.clone();
    let phone     = customer.phone.clone();
    let is_active = customer.is_active;
    let created   = customer.created;
    let updated   = customer.updated;
    let version   = customer.version;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let written = match id {
          None => tx
            .execute(
              "INSERT INTO customers (full_name, email, phone, is_active, created, updated)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![full_name, email, phone, is_active, created, updated],
            )
            .map(|_| SaveOutcome::Saved { id: tx.last_insert_rowid(), version: 0 }),
          Some(id) => tx
            .execute(
              "UPDATE customers
               SET full_name = ?2, email = ?3, phone = ?4,
                   is_active = ?5, created = ?6, updated = ?7,
                   version = version + 1
               WHERE id = ?1 AND version = ?8",
              rusqlite::params![
                id, full_name, email, phone, is_active, created, updated, version
              ],
            )
            .and_then(|changed| match changed {
              1 => Ok(SaveOutcome::Saved { id, version: version + 1 }),
              _ => {
                let exists = tx
                  .query_row("SELECT 1 FROM customers WHERE id = ?1", [id], |_| Ok(()))
                  .optional()?
                  .is_some();
                Ok(if exists {
                  SaveOutcome::Stale(CustomerId(id))
                } else {
                  SaveOutcome::MissingRow(CustomerId(id))
                })
              }
            }),
        };

        // Anything but a successful write drops `tx`, which rolls back.
        match written {
          Ok(outcome @ SaveOutcome::Saved { .. }) => {
            tx.commit()?;
            Ok(outcome)
          }
          Ok(outcome) => Ok(outcome),
          Err(e) if is_unique_violation(&e) => Ok(SaveOutcome::DuplicateEmail),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(outcome)
  }
}

// ─── CustomerStore impl ──────────────────────────────────────────────────────

impl CustomerStore for SqliteStore {
  type Error = Error;

  async fn exists_by_email(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM customers WHERE email = ?1",
              rusqlite::params![email],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
    let customer = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM customers WHERE id = ?1"),
              rusqlite::params![id.0],
              customer_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(customer)
  }

  async fn find_all(&self) -> Result<Vec<Customer>> {
    let customers = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM customers ORDER BY id"))?;
        let rows = stmt
          .query_map([], customer_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(customers)
  }

  async fn save(&self, mut customer: Customer) -> Result<Customer> {
    match self.write(&customer).await? {
      SaveOutcome::Saved { id, version } => {
        customer.id = Some(CustomerId(id));
        customer.version = version;
        Ok(customer)
      }
      SaveOutcome::DuplicateEmail => Err(Error::DuplicateEmail(customer.email)),
      SaveOutcome::MissingRow(id) => Err(Error::MissingRow(id)),
      SaveOutcome::Stale(id) => Err(Error::Stale(id)),
    }
  }
}
