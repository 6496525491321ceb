// User CRUD and behavior reconstruction HTTP routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use journeylens_core::{AnalyticsError, User, UserBehavior};
use journeylens_storage::Database;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::{ApiError, ApiResponse};
use crate::services::UserService;

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(UserService::new(db)),
        }
    }
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users", post(create_user).get(list_users))
        .route("/v1/users/behavior/:user_id", get(get_user_behavior))
        .route("/v1/users/:id", get(get_user))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Optional behavior date-range filter, inclusive on both bounds.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// POST /v1/users - Create a new user
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<User>),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = state.service.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(user, "User created successfully")),
    ))
}

/// GET /v1/users - List all users
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<User>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.service.list().await?;
    tracing::info!(count = users.len(), "Fetched all users");
    Ok(Json(ApiResponse::ok(users, "Users retrieved successfully")))
}

/// GET /v1/users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = ApiResponse<User>),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| AnalyticsError::not_found("User not found"))?;

    Ok(Json(ApiResponse::ok(user, "User retrieved successfully")))
}

/// GET /v1/users/behavior/{user_id} - Reconstruct a user's journey
#[utoipa::path(
    get,
    path = "/v1/users/behavior/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID"),
        BehaviorQuery
    ),
    responses(
        (status = 200, description = "Behavior reconstruction", body = ApiResponse<UserBehavior>),
        (status = 400, description = "Invalid user ID or date range"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user_behavior(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<BehaviorQuery>,
) -> Result<Json<ApiResponse<UserBehavior>>, ApiError> {
    tracing::info!(
        user_id = %user_id,
        start_date = ?query.start_date,
        end_date = ?query.end_date,
        "Fetching user behavior"
    );

    let behavior = state
        .service
        .user_behavior(
            &user_id,
            query.start_date.as_deref(),
            query.end_date.as_deref(),
        )
        .await?
        .ok_or_else(|| AnalyticsError::not_found("User behavior data not found"))?;

    Ok(Json(ApiResponse::ok(behavior, "User behavior retrieved")))
}
