//! # Router
//!
//! ```text
//! GET              /health
//!
//! GET  POST        /api/raw-materials
//! GET  DELETE      /api/raw-materials/{id}
//! POST             /api/raw-materials/{id}/adjustments
//! GET              /api/raw-materials/{id}/movements
//!
//! GET  POST        /api/finished-products
//! GET  DELETE      /api/finished-products/{id}
//!
//! GET  POST        /api/suppliers
//! GET  DELETE      /api/suppliers/{id}
//!
//! GET  POST        /api/orders
//! GET              /api/orders/{id}
//! POST             /api/orders/{id}/launch | finish | cancel
//!
//! GET              /api/scan/{code}
//! POST             /api/scan/{code}/raw-material
//! POST             /api/scan/{code}/adjustments
//!
//! GET              /api/dashboard
//! ```
//!
//! Every `/api` handler takes a [`CurrentUser`](crate::auth::CurrentUser), so
//! a request without `x-user-id` is answered 401 before any service runs.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{dashboard, finished_products, health, orders, raw_materials, scan, suppliers};
use crate::state::AppState;

/// Builds the complete application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // ===== Stock ledger =====
        .route("/raw-materials", get(raw_materials::list).post(raw_materials::create))
        .route(
            "/raw-materials/{id}",
            get(raw_materials::get).delete(raw_materials::deactivate),
        )
        .route("/raw-materials/{id}/adjustments", post(raw_materials::adjust))
        .route("/raw-materials/{id}/movements", get(raw_materials::movements))
        // ===== Catalog =====
        .route(
            "/finished-products",
            get(finished_products::list).post(finished_products::create),
        )
        .route(
            "/finished-products/{id}",
            get(finished_products::get).delete(finished_products::deactivate),
        )
        .route("/suppliers", get(suppliers::list).post(suppliers::create))
        .route("/suppliers/{id}", get(suppliers::get).delete(suppliers::deactivate))
        // ===== Production =====
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/launch", post(orders::launch))
        .route("/orders/{id}/finish", post(orders::finish))
        .route("/orders/{id}/cancel", post(orders::cancel))
        // ===== Scan =====
        .route("/scan/{code}", get(scan::resolve))
        .route("/scan/{code}/raw-material", post(scan::create_raw_material))
        .route("/scan/{code}/adjustments", post(scan::adjust))
        // ===== Dashboard =====
        .route("/dashboard", get(dashboard::summary));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .with_state(state)
}
