use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::{auth::AuthenticatedUser, error::ApiResult, main_lib::AppState};
use rideledger_core::reports::{
    DailyPoint, EarningsSummary, MonthlyStats, PlatformStats, SummaryQuery,
};

/// Dashboard summary for the reference month (defaults to the current one).
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(
        ("month" = Option<u32>, Query, description = "Reference month, 1-12"),
        ("year" = Option<i32>, Query, description = "Reference year")
    ),
    responses((status = 200, description = "Earnings summary"), (status = 400, description = "Invalid period"))
)]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Json<EarningsSummary>> {
    let Query(query) = query?;
    let summary = state
        .report_service
        .get_earnings_summary(&user.user_id, query)
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(get, path = "/api/v1/reports/monthly", responses((status = 200, description = "OK")))]
pub async fn get_monthly_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<MonthlyStats>>> {
    let stats = state.report_service.get_monthly_stats(&user.user_id).await?;
    Ok(Json(stats))
}

#[utoipa::path(get, path = "/api/v1/reports/platforms", responses((status = 200, description = "OK")))]
pub async fn get_platform_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<PlatformStats>>> {
    let stats = state
        .report_service
        .get_platform_stats(&user.user_id)
        .await?;
    Ok(Json(stats))
}

#[utoipa::path(get, path = "/api/v1/reports/daily", responses((status = 200, description = "OK")))]
pub async fn get_daily_series(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<DailyPoint>>> {
    let Query(query) = query?;
    let series = state
        .report_service
        .get_daily_series(&user.user_id, query)
        .await?;
    Ok(Json(series))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/summary", get(get_summary))
        .route("/reports/monthly", get(get_monthly_stats))
        .route("/reports/platforms", get(get_platform_stats))
        .route("/reports/daily", get(get_daily_series))
}
