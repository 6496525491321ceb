// Health endpoint with a database connectivity probe

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use journeylens_storage::Database;
use serde::Serialize;
use std::sync::Arc;

use crate::common::ApiResponse;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthServices {
    database: &'static str,
    api: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    version: &'static str,
    services: HealthServices,
}

/// GET /health - 200 when the database answers, 503 when it doesn't
async fn health(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let db_ok = match state.db.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check database probe failed");
            false
        }
    };

    let (status, body) = health_response(db_ok);
    (status, Json(body))
}

fn health_response(db_ok: bool) -> (StatusCode, ApiResponse<serde_json::Value>) {
    let data = HealthData {
        status: if db_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        services: HealthServices {
            database: if db_ok { "connected" } else { "disconnected" },
            api: "running",
        },
    };

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let message = if db_ok {
        "Service is healthy"
    } else {
        "Service degraded"
    };

    let body = ApiResponse {
        success: db_ok,
        data: serde_json::json!(data),
        message: message.to_string(),
        status_code: status.as_u16(),
    };
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_response_is_200_success() {
        let (status, body) = health_response(true);
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert_eq!(body.status_code, 200);
        assert_eq!(body.data["status"], "healthy");
        assert_eq!(body.data["services"]["database"], "connected");
    }

    #[test]
    fn degraded_response_is_503_failure() {
        let (status, body) = health_response(false);
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.success);
        assert_eq!(body.status_code, 503);
        assert_eq!(body.data["status"], "degraded");
        assert_eq!(body.data["services"]["database"], "disconnected");
    }
}
