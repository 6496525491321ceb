// Analytics aggregation HTTP routes

use axum::{extract::State, routing::get, Json, Router};
use journeylens_core::{ConversionMetrics, DailyKpi, PageVisits, SessionAnalytics, UserAnalytics};
use journeylens_storage::Database;
use std::sync::Arc;

use crate::common::{ApiError, ApiResponse};
use crate::services::AnalyticsService;

/// App state for analytics routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalyticsService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(AnalyticsService::new(db)),
        }
    }
}

/// Create analytics routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/analytics/kpi", get(get_daily_kpis))
        .route("/v1/analytics/users", get(get_user_analytics))
        .route("/v1/analytics/sessions", get(get_session_analytics))
        .route("/v1/analytics/conversions", get(get_conversion_metrics))
        .route("/v1/analytics/top-pages", get(get_top_pages))
        .with_state(state)
}

/// GET /v1/analytics/kpi - Daily KPIs over the rolling 30-day window
#[utoipa::path(
    get,
    path = "/v1/analytics/kpi",
    responses(
        (status = 200, description = "Daily KPIs, newest date first", body = ApiResponse<Vec<DailyKpi>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_daily_kpis(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DailyKpi>>>, ApiError> {
    let kpis = state.service.daily_kpis().await?;
    tracing::info!(days = kpis.len(), "Computed daily KPIs");
    Ok(Json(ApiResponse::ok(kpis, "Daily KPIs retrieved successfully")))
}

/// GET /v1/analytics/users - Total/new/returning user counts
#[utoipa::path(
    get,
    path = "/v1/analytics/users",
    responses(
        (status = 200, description = "User analytics", body = ApiResponse<UserAnalytics>),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_user_analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserAnalytics>>, ApiError> {
    let analytics = state.service.user_analytics().await?;
    Ok(Json(ApiResponse::ok(
        analytics,
        "User analytics retrieved successfully",
    )))
}

/// GET /v1/analytics/sessions - Averages over all sessions
#[utoipa::path(
    get,
    path = "/v1/analytics/sessions",
    responses(
        (status = 200, description = "Session analytics", body = ApiResponse<SessionAnalytics>),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_session_analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SessionAnalytics>>, ApiError> {
    let analytics = state.service.session_analytics().await?;
    Ok(Json(ApiResponse::ok(
        analytics,
        "Session analytics retrieved successfully",
    )))
}

/// GET /v1/analytics/conversions - Funnel ratios over the 30-day window
#[utoipa::path(
    get,
    path = "/v1/analytics/conversions",
    responses(
        (status = 200, description = "Conversion metrics", body = ApiResponse<ConversionMetrics>),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_conversion_metrics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ConversionMetrics>>, ApiError> {
    let metrics = state.service.conversion_metrics().await?;
    Ok(Json(ApiResponse::ok(
        metrics,
        "Conversion metrics retrieved successfully",
    )))
}

/// GET /v1/analytics/top-pages - All-time top 10 pages by visits
#[utoipa::path(
    get,
    path = "/v1/analytics/top-pages",
    responses(
        (status = 200, description = "Top pages by visit count", body = ApiResponse<Vec<PageVisits>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "analytics"
)]
pub async fn get_top_pages(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PageVisits>>>, ApiError> {
    let pages = state.service.top_pages().await?;
    Ok(Json(ApiResponse::ok(pages, "Top pages retrieved successfully")))
}
