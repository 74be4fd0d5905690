use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use rideledger_core::platforms::Platform;

#[utoipa::path(get, path = "/api/v1/platforms", responses((status = 200, description = "OK")))]
pub async fn list_platforms(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Platform>>> {
    let platforms = state.platform_service.list_platforms()?;
    Ok(Json(platforms))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/platforms", get(list_platforms))
}
