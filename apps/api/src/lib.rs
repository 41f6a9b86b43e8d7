//! # fabstock-api
//!
//! JSON API behind the fabstock browser UI.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Browser ──► axum Router ──► CurrentUser (x-user-id) ──► handler        │
//! │                                                             │           │
//! │                                                             ▼           │
//! │                                              Service (built in state.rs)│
//! │                                                  │               │      │
//! │                                                  ▼               ▼      │
//! │                                           fabstock-core    fabstock-db  │
//! │                                           (rules)          (SQLite)     │
//! │                                                                         │
//! │  Errors: CoreError / DbError ──► ApiError { code, message } + status    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - `ApiConfig` (defaults, TOML, `FABSTOCK_*` env)
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`auth`] - `CurrentUser` extractor
//! - [`services`] - One service per domain area
//! - [`handlers`] / [`routes`] - HTTP adapters and the router

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::AppState;
