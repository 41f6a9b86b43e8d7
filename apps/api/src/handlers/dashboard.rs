//! Dashboard endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /api/dashboard`
pub async fn summary(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.dashboard.summary().await?))
}
