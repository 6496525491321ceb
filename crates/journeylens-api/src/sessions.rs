// Session HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use journeylens_core::{AnalyticsError, Session};
use journeylens_storage::Database;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{ApiError, ApiResponse, PageQuery};
use crate::services::SessionService;

/// App state for session routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SessionService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(SessionService::new(db)),
        }
    }
}

/// Create session routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/sessions", post(create_session).get(list_sessions))
        .route("/v1/sessions/user/:user_id", get(list_sessions_by_user))
        .route("/v1/sessions/:id", get(get_session))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub user_id: Uuid,
    /// Defaults to now.
    pub session_start: Option<DateTime<Utc>>,
    pub session_end: Option<DateTime<Utc>>,
    pub pages_visited: Option<i32>,
    /// Seconds.
    pub time_spent: Option<i32>,
}

/// POST /v1/sessions - Record a new session
#[utoipa::path(
    post,
    path = "/v1/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = ApiResponse<Session>),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Session>>), ApiError> {
    let session = state.service.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(session, "Session created")),
    ))
}

/// GET /v1/sessions - List sessions, newest first
#[utoipa::path(
    get,
    path = "/v1/sessions",
    params(PageQuery),
    responses(
        (status = 200, description = "List of sessions", body = ApiResponse<Vec<Session>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    let (limit, offset) = query.to_limit_offset();
    let sessions = state.service.list(limit, offset).await?;
    Ok(Json(ApiResponse::ok(
        sessions,
        "Sessions retrieved successfully",
    )))
}

/// GET /v1/sessions/{id} - Get session by ID
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = ApiResponse<Session>),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let session = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| AnalyticsError::not_found("Session not found"))?;

    Ok(Json(ApiResponse::ok(
        session,
        "Session retrieved successfully",
    )))
}

/// GET /v1/sessions/user/{user_id} - All sessions for one user
#[utoipa::path(
    get,
    path = "/v1/sessions/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's sessions", body = ApiResponse<Vec<Session>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "sessions"
)]
pub async fn list_sessions_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Session>>>, ApiError> {
    let sessions = state.service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(
        sessions,
        "Sessions retrieved successfully",
    )))
}
