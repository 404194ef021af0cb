//! Handlers for `/customers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/customers` | Every customer, in id order |
//! | `POST`   | `/customers` | Body: [`CreateBody`]; returns 201 + customer |
//! | `GET`    | `/customers/{id}` | 404 if not found |
//! | `PUT`    | `/customers/{id}` | Body: [`UpdateBody`]; email cannot change |
//! | `DELETE` | `/customers/{id}` | Soft delete; 204, or 304 if already inactive |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use customers_core::{
  customer::{Customer, CustomerId, CustomerUpdate, NewCustomer},
  service::CustomerService,
  store::CustomerStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

type Service<S> = State<Arc<CustomerService<S>>>;

// ─── Wire types ──────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /customers`.
///
/// Fields are optional at the decoding layer so that a missing or `null`
/// value is reported by the validation rules rather than as a parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub full_name: Option<String>,
  pub email:     Option<String>,
  pub phone:     Option<String>,
}

impl From<CreateBody> for NewCustomer {
  fn from(b: CreateBody) -> Self {
    NewCustomer {
      full_name: b.full_name.unwrap_or_default(),
      email:     b.email.unwrap_or_default(),
      phone:     b.phone,
    }
  }
}

/// JSON body accepted by `PUT /customers/{id}`. Any `email` field is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub full_name: Option<String>,
  pub phone:     Option<String>,
}

impl From<UpdateBody> for CustomerUpdate {
  fn from(b: UpdateBody) -> Self {
    CustomerUpdate {
      full_name: b.full_name.unwrap_or_default(),
      phone:     b.phone,
    }
  }
}

/// The customer representation returned by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
  pub id:        Option<CustomerId>,
  pub full_name: String,
  pub email:     String,
  pub phone:     Option<String>,
  pub is_active: bool,
}

impl From<Customer> for CustomerInfo {
  fn from(c: Customer) -> Self {
    CustomerInfo {
      id:        c.id,
      full_name: c.full_name,
      email:     c.email,
      phone:     c.phone,
      is_active: c.is_active,
    }
  }
}

fn customer_id(path: Result<Path<i64>, PathRejection>) -> Result<CustomerId, ApiError> {
  let Path(id) = path?;
  Ok(CustomerId(id))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /customers`
pub async fn list<S: CustomerStore>(
  State(service): Service<S>,
) -> Result<Json<Vec<CustomerInfo>>, ApiError> {
  let customers = service.get_all().await?;
  Ok(Json(customers.into_iter().map(CustomerInfo::from).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers` returns 201 + the stored customer.
pub async fn create<S: CustomerStore>(
  State(service): Service<S>,
  body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let customer = service.create(body.into()).await?;
  Ok((StatusCode::CREATED, Json(CustomerInfo::from(customer))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/{id}`
pub async fn get_one<S: CustomerStore>(
  State(service): Service<S>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<CustomerInfo>, ApiError> {
  let id = customer_id(path)?;
  let customer = service.get_by_id(id).await?;
  Ok(Json(customer.into()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /customers/{id}` overwrites `fullName` and `phone`.
pub async fn update<S: CustomerStore>(
  State(service): Service<S>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<CustomerInfo>, ApiError> {
  let id = customer_id(path)?;
  let Json(body) = body?;
  let customer = service.update(id, body.into()).await?;
  Ok(Json(customer.into()))
}

// ─── Deactivate ───────────────────────────────────────────────────────────────

/// `DELETE /customers/{id}` soft-deletes; the row is kept, inactive.
pub async fn deactivate<S: CustomerStore>(
  State(service): Service<S>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
  let id = customer_id(path)?;
  service.deactivate(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
