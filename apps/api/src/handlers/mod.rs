//! # HTTP Handlers
//!
//! Thin adapters: extract identity, path and body, call one service method,
//! wrap the result in JSON. No business rule lives here.

pub mod dashboard;
pub mod finished_products;
pub mod health;
pub mod orders;
pub mod raw_materials;
pub mod scan;
pub mod suppliers;

use axum::extract::FromRequest;
use serde::Deserialize;

use crate::error::ApiError;

/// `Json` whose rejection is an [`ApiError`], so malformed bodies get the
/// same `{code, message}` shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `?limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}
