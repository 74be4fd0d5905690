use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};
use rideledger_core::users::{NewUser, SignInRequest};

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/registers",
    responses((status = 201, description = "Registered"), (status = 409, description = "E-mail taken"))
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(payload) = payload?;
    let user = state.user_service.register(payload).await?;
    tracing::info!("New user registered: {}", user.id);
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    responses((status = 200, description = "Bearer token"), (status = 400, description = "Invalid credentials"))
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = state.auth.issue_token(&user.id)?;
    Ok(Json(TokenResponse { token }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/registers", post(register))
        .route("/sessions", post(create_session))
}
