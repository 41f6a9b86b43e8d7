//! Liveness probe. No identity required.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use fabstock_db::migrations::migration_status;

use crate::state::AppState;

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.db.health_check().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let (total, applied) = migration_status(state.db.pool()).await.unwrap_or((0, 0));

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "database": database,
            "migrations": { "total": total, "applied": applied },
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
