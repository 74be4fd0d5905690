use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::{auth::AuthenticatedUser, error::ApiResult, main_lib::AppState};
use rideledger_core::rides::{NewRide, Ride, RideFilter};

#[utoipa::path(get, path = "/api/v1/rides", responses((status = 200, description = "OK")))]
pub async fn list_rides(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    filter: Result<Query<RideFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<Ride>>> {
    let Query(filter) = filter?;
    let rides = state.ride_service.list_rides(&user.user_id, filter)?;
    Ok(Json(rides))
}

#[utoipa::path(
    post,
    path = "/api/v1/rides",
    responses((status = 200, description = "OK"), (status = 409, description = "Duplicate ride"))
)]
pub async fn create_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ride: Result<Json<NewRide>, JsonRejection>,
) -> ApiResult<Json<Ride>> {
    let Json(ride) = ride?;
    let created = state.ride_service.create_ride(&user.user_id, ride).await?;
    Ok(Json(created))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rides/{id}",
    params(("id" = String, Path, description = "Ride id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found"))
)]
pub async fn delete_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.ride_service.delete_ride(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rides", get(list_rides).post(create_ride))
        .route("/rides/{id}", delete(delete_ride))
}
