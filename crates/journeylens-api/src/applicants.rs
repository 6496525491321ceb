// Applicant action HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use journeylens_core::{AnalyticsError, Applicant};
use journeylens_storage::{ApplicantFilter, Database};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::{ApiError, ApiResponse};
use crate::services::ApplicantService;

/// App state for applicant routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ApplicantService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(ApplicantService::new(db)),
        }
    }
}

/// Create applicant routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/applicants", post(create_applicant).get(list_applicants))
        .route("/v1/applicants/user/:user_id", get(list_applicants_by_user))
        .route("/v1/applicants/:id", get(get_applicant))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicantRequest {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub action_type: String,
    pub item_id: Option<String>,
    /// Defaults to "completed".
    pub status: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Optional listing filters; unset fields match everything.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantQuery {
    pub user_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub action_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// POST /v1/applicants - Record an applicant action
#[utoipa::path(
    post,
    path = "/v1/applicants",
    request_body = CreateApplicantRequest,
    responses(
        (status = 201, description = "Applicant action created", body = ApiResponse<Applicant>),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "applicants"
)]
pub async fn create_applicant(
    State(state): State<AppState>,
    Json(req): Json<CreateApplicantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Applicant>>), ApiError> {
    let applicant = state.service.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(applicant, "Applicant action created")),
    ))
}

/// GET /v1/applicants - List applicant actions with optional filters
#[utoipa::path(
    get,
    path = "/v1/applicants",
    params(ApplicantQuery),
    responses(
        (status = 200, description = "Applicant actions", body = ApiResponse<Vec<Applicant>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "applicants"
)]
pub async fn list_applicants(
    State(state): State<AppState>,
    Query(query): Query<ApplicantQuery>,
) -> Result<Json<ApiResponse<Vec<Applicant>>>, ApiError> {
    let filter = ApplicantFilter {
        user_id: query.user_id,
        session_id: query.session_id,
        action_type: query.action_type,
        status: query.status,
        from: query.from,
        to: query.to,
    };
    let applicants = state.service.list(filter).await?;
    Ok(Json(ApiResponse::ok(
        applicants,
        "Applicants retrieved successfully",
    )))
}

/// GET /v1/applicants/{id} - Get applicant action by ID
#[utoipa::path(
    get,
    path = "/v1/applicants/{id}",
    params(
        ("id" = Uuid, Path, description = "Applicant action ID")
    ),
    responses(
        (status = 200, description = "Applicant action found", body = ApiResponse<Applicant>),
        (status = 404, description = "Applicant action not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "applicants"
)]
pub async fn get_applicant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Applicant>>, ApiError> {
    let applicant = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| AnalyticsError::not_found("Applicant not found"))?;

    Ok(Json(ApiResponse::ok(
        applicant,
        "Applicant retrieved successfully",
    )))
}

/// GET /v1/applicants/user/{user_id} - All applicant actions for one user
#[utoipa::path(
    get,
    path = "/v1/applicants/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's applicant actions", body = ApiResponse<Vec<Applicant>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "applicants"
)]
pub async fn list_applicants_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Applicant>>>, ApiError> {
    let applicants = state.service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(
        applicants,
        "Applicants retrieved successfully",
    )))
}
