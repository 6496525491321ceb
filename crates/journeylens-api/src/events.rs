// Event ingestion and read HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use journeylens_core::{AnalyticsError, Event, EventType};
use journeylens_storage::Database;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{ApiError, ApiResponse, PageQuery};
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(EventService::new(db)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/user/:user_id", get(list_events_by_user))
        .route("/v1/events/session/:session_id", get(list_events_by_session))
        .route("/v1/events/:id", get(get_event))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    /// Event kind; `eventType` is accepted as a legacy alias.
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    #[serde(rename = "eventType")]
    pub event_type_alias: Option<EventType>,
    pub page: Option<String>,
    pub item_id: Option<String>,
    pub duration: Option<i32>,
    pub purchase_count: Option<i32>,
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

/// POST /v1/events - Record a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<Event>),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Event>>), ApiError> {
    let event = state.service.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(event, "Event created")),
    ))
}

/// GET /v1/events - List events, newest first
#[utoipa::path(
    get,
    path = "/v1/events",
    params(PageQuery),
    responses(
        (status = 200, description = "List of events", body = ApiResponse<Vec<Event>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    let (limit, offset) = query.to_limit_offset();
    let events = state.service.list(limit, offset).await?;
    Ok(Json(ApiResponse::ok(events, "Events retrieved successfully")))
}

/// GET /v1/events/{id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<Event>),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Event>>, ApiError> {
    let event = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| AnalyticsError::not_found("Event not found"))?;

    Ok(Json(ApiResponse::ok(event, "Event retrieved successfully")))
}

/// GET /v1/events/user/{user_id} - All events for one user
#[utoipa::path(
    get,
    path = "/v1/events/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's events", body = ApiResponse<Vec<Event>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    let events = state.service.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(events, "Events retrieved successfully")))
}

/// GET /v1/events/session/{session_id} - Events within one session
#[utoipa::path(
    get,
    path = "/v1/events/session/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Session's events", body = ApiResponse<Vec<Event>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>, ApiError> {
    let (limit, offset) = query.to_limit_offset();
    let events = state
        .service
        .list_by_session(session_id, limit, offset)
        .await?;
    Ok(Json(ApiResponse::ok(events, "Events retrieved successfully")))
}
