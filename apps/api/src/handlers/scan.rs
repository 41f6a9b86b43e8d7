//! Barcode endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::handlers::ApiJson;
use crate::services::{AdjustmentInput, ScanCreateInput};
use crate::state::AppState;

/// `GET /api/scan/{code}`: always 200, `kind` tells what was found.
pub async fn resolve(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(code): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.scan.resolve(&code).await?))
}

pub async fn create_raw_material(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(code): Path<String>,
    ApiJson(input): ApiJson<ScanCreateInput>,
) -> ApiResult<impl IntoResponse> {
    let material = state.scan.create_from_scan(&code, input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

pub async fn adjust(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(code): Path<String>,
    ApiJson(input): ApiJson<AdjustmentInput>,
) -> ApiResult<impl IntoResponse> {
    let result = state.scan.adjust_scanned(&code, input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
