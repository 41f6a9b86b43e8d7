//! Manufacturing order endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::handlers::{ApiJson, ListQuery};
use crate::services::{CreateOrderInput, FinishOrderInput};
use crate::state::AppState;

/// `GET /api/orders?limit=`, newest first.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.production.list_orders(query.limit).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<CreateOrderInput>,
) -> ApiResult<impl IntoResponse> {
    let order = state.production.create_order(input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.production.get_order(&id).await?))
}

/// `POST /api/orders/{id}/launch`; the caller becomes the operator.
pub async fn launch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.production.launch(&id, user.id()).await?))
}

pub async fn finish(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<FinishOrderInput>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.production.finish(&id, input, user.id()).await?))
}

pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.production.cancel(&id, user.id()).await?))
}
