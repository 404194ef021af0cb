//! Core types and trait definitions for the customers service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the customer entity, its validation rules, the domain error taxonomy, the
//! [`store::CustomerStore`] abstraction, and the lifecycle
//! [`service::CustomerService`] that ties them together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod customer;
pub mod error;
pub mod service;
pub mod store;
pub mod validate;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{Error, ErrorKind, Result};
