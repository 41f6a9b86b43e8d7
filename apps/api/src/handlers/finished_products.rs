//! Finished product catalog endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::handlers::ApiJson;
use crate::services::CreateFinishedProductInput;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_finished_products().await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(input): ApiJson<CreateFinishedProductInput>,
) -> ApiResult<impl IntoResponse> {
    let product = state.catalog.create_finished_product(input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.get_finished_product(&id).await?))
}

pub async fn deactivate(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.catalog.deactivate_finished_product(&id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
