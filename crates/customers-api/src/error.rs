//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! This is the only place a domain [`ErrorKind`] becomes an HTTP status, and
//! the place every failed request is logged.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{Method, StatusCode},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use customers_core::ErrorKind;
use serde::Serialize;
use thiserror::Error;

/// Message returned in place of internal detail for unexpected failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Customer(#[from] customers_core::Error),

  /// The body was missing, not JSON, or the wrong shape.
  #[error("{}", .0.body_text())]
  Body(#[from] JsonRejection),

  /// A path parameter failed to parse, e.g. a non-numeric id.
  #[error("{}", .0.body_text())]
  Path(#[from] PathRejection),

  #[error("No route for {method} {path}")]
  NoRoute { method: Method, path: String },

  #[error("Method {method} is not allowed for {path}")]
  MethodNotAllowed { method: Method, path: String },
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Customer(e) => status_for(e.kind()),
      Self::Body(_) | Self::Path(_) => status_for(ErrorKind::ValidationFailed),
      Self::NoRoute { .. } => StatusCode::NOT_FOUND,
      Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
    }
  }
}

/// Canonical status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::ValidationFailed | ErrorKind::AlreadyExists => {
      StatusCode::BAD_REQUEST
    }
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::FieldUnchanged => StatusCode::NOT_MODIFIED,
    ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// The error envelope sent to callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub message:   String,
  pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();

    let message = if status.is_server_error() {
      tracing::error!(status = status.as_u16(), error = ?self, "{self}");
      INTERNAL_ERROR_MESSAGE.to_owned()
    } else {
      tracing::warn!(status = status.as_u16(), "{self}");
      self.to_string()
    };

    let body = ErrorBody { message, timestamp: Utc::now() };
    (status, Json(body)).into_response()
  }
}
