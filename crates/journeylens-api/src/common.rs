// Shared response envelope and error mapping for the public API
//
// Every success body is `{success: true, data, message, statusCode}`;
// every error body is `{success: false, error, statusCode}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use journeylens_core::AnalyticsError;

/// Standard success envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            status_code: 200,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            status_code: 201,
        }
    }
}

/// Typed error carried out of the service layer and rendered as the
/// error envelope. Validation -> 400, NotFound -> 404, Internal -> 500
/// with the underlying cause logged server-side only.
#[derive(Debug)]
pub struct ApiError(pub AnalyticsError);

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(AnalyticsError::Internal(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match &self.0 {
            AnalyticsError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "error": message,
            "statusCode": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// Page/limit query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp to page >= 1, limit in [1, 500]; defaults page 1, limit 50.
    /// Offset saturates so absurd page numbers cannot overflow.
    pub fn to_limit_offset(self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(50).clamp(1, 500);
        (limit, page.saturating_sub(1).saturating_mul(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn validation_error_renders_400_envelope() {
        let response =
            ApiError(AnalyticsError::validation("userId cannot be empty")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "userId cannot be empty");
        assert_eq!(json["statusCode"], 400);
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let response =
            ApiError(AnalyticsError::from(anyhow::anyhow!("connection refused"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal Server Error");
    }

    #[test]
    fn page_query_clamps_bounds() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(q.to_limit_offset(), (500, 0));

        let q = PageQuery {
            page: Some(3),
            limit: None,
        };
        assert_eq!(q.to_limit_offset(), (50, 100));

        let q = PageQuery {
            page: None,
            limit: None,
        };
        assert_eq!(q.to_limit_offset(), (50, 0));
    }

    #[test]
    fn page_query_offset_saturates_at_i64_max() {
        let q = PageQuery {
            page: Some(i64::MAX),
            limit: Some(500),
        };
        let (limit, offset) = q.to_limit_offset();
        assert_eq!(limit, 500);
        assert_eq!(offset, i64::MAX);

        let q = PageQuery {
            page: Some(i64::MAX),
            limit: None,
        };
        let (_, offset) = q.to_limit_offset();
        assert!(offset >= 0);
    }

    #[test]
    fn envelope_serializes_camel_case() {
        let body = ApiResponse::ok(vec![1, 2], "Success");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
