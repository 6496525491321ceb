// Journeylens API server
// Decision: per-module route states built once at startup; no global mutable config

mod analytics;
mod applicants;
mod common;
mod events;
mod health;
mod services;
mod sessions;
mod users;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use journeylens_core::{
    Applicant, BehaviorSummary, ConversionMetrics, DailyKpi, Event, EventType, PageActivity,
    PageVisits, Session, SessionAnalytics, User, UserAnalytics, UserBehavior,
};
use journeylens_storage::Database;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::ApiResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        analytics::get_daily_kpis,
        analytics::get_user_analytics,
        analytics::get_session_analytics,
        analytics::get_conversion_metrics,
        analytics::get_top_pages,
        users::create_user,
        users::list_users,
        users::get_user,
        users::get_user_behavior,
        events::create_event,
        events::list_events,
        events::get_event,
        events::list_events_by_user,
        events::list_events_by_session,
        sessions::create_session,
        sessions::list_sessions,
        sessions::get_session,
        sessions::list_sessions_by_user,
        applicants::create_applicant,
        applicants::list_applicants,
        applicants::get_applicant,
        applicants::list_applicants_by_user,
    ),
    components(
        schemas(
            Event, EventType, Session, User, Applicant,
            DailyKpi, ConversionMetrics, UserAnalytics, SessionAnalytics, PageVisits,
            UserBehavior, BehaviorSummary, PageActivity,
            users::CreateUserRequest,
            events::CreateEventRequest,
            sessions::CreateSessionRequest,
            applicants::CreateApplicantRequest,
            ApiResponse<Vec<DailyKpi>>,
            ApiResponse<ConversionMetrics>,
            ApiResponse<UserAnalytics>,
            ApiResponse<SessionAnalytics>,
            ApiResponse<Vec<PageVisits>>,
            ApiResponse<UserBehavior>,
            ApiResponse<User>,
            ApiResponse<Vec<User>>,
            ApiResponse<Event>,
            ApiResponse<Vec<Event>>,
            ApiResponse<Session>,
            ApiResponse<Vec<Session>>,
            ApiResponse<Applicant>,
            ApiResponse<Vec<Applicant>>,
        )
    ),
    tags(
        (name = "analytics", description = "Aggregated KPIs, conversions, and rankings"),
        (name = "users", description = "User management and behavior reconstruction"),
        (name = "events", description = "Raw event ingestion and queries"),
        (name = "sessions", description = "Session management endpoints"),
        (name = "applicants", description = "Applicant action tracking")
    ),
    info(
        title = "Journeylens API",
        version = "0.2.0",
        description = "User-journey analytics: events, sessions, KPIs, conversion metrics, and behavior timelines",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journeylens_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("journeylens-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    journeylens_storage::MIGRATOR
        .run(db.pool())
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    // Create app state
    let db = Arc::new(db);

    // Create module-specific states
    let analytics_state = analytics::AppState::new(db.clone());
    let users_state = users::AppState::new(db.clone());
    let events_state = events::AppState::new(db.clone());
    let sessions_state = sessions::AppState::new(db.clone());
    let applicants_state = applicants::AppState::new(db.clone());
    let health_state = health::AppState { db: db.clone() };

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/analytics/kpi
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when the dashboard is served from a different origin
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(analytics::routes(analytics_state))
        .merge(users::routes(users_state))
        .merge(events::routes(events_state))
        .merge(sessions::routes(sessions_state))
        .merge(applicants::routes(applicants_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().merge(health::routes(health_state));

    // Apply API prefix if configured
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let port = std::env::var("PORT").unwrap_or_else(|_| "9000".into());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/v1/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
