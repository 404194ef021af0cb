//! SQL schema for the customers SQLite store.
//!
//! Executed once at connection startup. Databases created before the
//! `version` column existed are upgraded by [`ADD_VERSION_COLUMN`].

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted; deactivation clears is_active.
-- AUTOINCREMENT keeps ids from ever being reused.
CREATE TABLE IF NOT EXISTS customers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name   TEXT    NOT NULL,
    email       TEXT    NOT NULL,
    phone       TEXT,
    is_active   INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
    created     INTEGER NOT NULL,   -- epoch seconds
    updated     INTEGER NOT NULL,   -- epoch seconds
    version     INTEGER NOT NULL DEFAULT 0  -- bumped on every rewrite
);

-- Authoritative uniqueness guard; the service's existence check is only a
-- fast path.
CREATE UNIQUE INDEX IF NOT EXISTS customers_email_idx ON customers(email);

PRAGMA user_version = 2;
";

/// Upgrade from `user_version` 1, whose table had no `version` column.
pub const ADD_VERSION_COLUMN: &str =
  "ALTER TABLE customers ADD COLUMN version INTEGER NOT NULL DEFAULT 0";
