//! Raw material and stock ledger endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::handlers::{ApiJson, ListQuery};
use crate::services::{AdjustmentInput, CreateRawMaterialInput};
use crate::state::AppState;

/// `GET /api/raw-materials`
pub async fn list(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.stock.list_raw_materials().await?))
}

/// `POST /api/raw-materials`
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<CreateRawMaterialInput>,
) -> ApiResult<impl IntoResponse> {
    let material = state.stock.create_raw_material(input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// `GET /api/raw-materials/{id}`
pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.stock.get_raw_material(&id).await?))
}

/// `DELETE /api/raw-materials/{id}`
pub async fn deactivate(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.stock.deactivate_raw_material(&id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/raw-materials/{id}/adjustments`
pub async fn adjust(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<AdjustmentInput>,
) -> ApiResult<impl IntoResponse> {
    let result = state.stock.adjust(&id, input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// `GET /api/raw-materials/{id}/movements?limit=`
pub async fn movements(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.stock.movement_history(&id, query.limit).await?))
}
