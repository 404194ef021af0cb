//! JSON REST API for the customers service.
//!
//! Exposes an axum [`Router`] backed by a [`CustomerService`] over any
//! [`CustomerStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, customers_api::app(service)).await?;
//! ```

pub mod customers;
pub mod error;

use std::sync::Arc;

use axum::{Router, extract::OriginalUri, http::Method, routing::get};
use customers_core::{service::CustomerService, store::CustomerStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the `/customers` routes for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<CustomerService<S>>) -> Router<()>
where
  S: CustomerStore + 'static,
{
  Router::new()
    .route(
      "/customers",
      get(customers::list::<S>)
        .post(customers::create::<S>)
        .fallback(method_not_allowed),
    )
    .route(
      "/customers/{id}",
      get(customers::get_one::<S>)
        .put(customers::update::<S>)
        .delete(customers::deactivate::<S>)
        .fallback(method_not_allowed),
    )
    .with_state(service)
}

/// The full application: [`api_router`] under `/api`, with request tracing.
pub fn app<S>(service: Arc<CustomerService<S>>) -> Router
where
  S: CustomerStore + 'static,
{
  Router::new()
    .nest("/api", api_router(service))
    .fallback(no_route)
    .layer(TraceLayer::new_for_http())
}

// Unmatched requests get the same envelope and log line as handler errors.

async fn no_route(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
  ApiError::NoRoute { method, path: uri.path().to_owned() }
}

async fn method_not_allowed(
  method: Method,
  OriginalUri(uri): OriginalUri,
) -> ApiError {
  ApiError::MethodNotAllowed { method, path: uri.path().to_owned() }
}
