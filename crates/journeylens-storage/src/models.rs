// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// User models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

// ============================================
// Session models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub pages_visited: i32,
    pub time_spent: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateSession {
    pub user_id: Uuid,
    /// Defaults to now() when absent.
    pub session_start: Option<DateTime<Utc>>,
    pub session_end: Option<DateTime<Utc>>,
    pub pages_visited: i32,
    pub time_spent: i32,
}

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub event_type: String,
    pub page: Option<String>,
    pub item_id: Option<String>,
    pub duration: i32,
    pub purchase_count: i32,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<sqlx::types::JsonValue>,
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    pub event_type: String,
    pub page: Option<String>,
    pub item_id: Option<String>,
    pub duration: i32,
    pub purchase_count: i32,
    /// Defaults to now() when absent.
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

// ============================================
// Applicant models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub action_type: String,
    pub item_id: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateApplicant {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub action_type: String,
    pub item_id: Option<String>,
    /// Defaults to "completed" when absent.
    pub status: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Optional applicant listing filters; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ApplicantFilter {
    pub user_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub action_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

// ============================================
// Aggregation result rows
// ============================================

/// Per-date page_view/purchase counts (events grouped by UTC date).
#[derive(Debug, Clone, FromRow)]
pub struct EventDailyCountsRow {
    pub date: String,
    pub page_visits: i64,
    pub purchase_count: i64,
}

/// Per-date count for a single-category grouped aggregation.
#[derive(Debug, Clone, FromRow)]
pub struct DateCountRow {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PageVisitsRow {
    pub page: String,
    pub visits: i64,
}

/// Single aggregate over all sessions; averages are NULL when the table
/// is empty.
#[derive(Debug, Clone, FromRow)]
pub struct SessionStatsRow {
    pub average_session_duration: Option<f64>,
    pub average_pages_per_session: Option<f64>,
    pub total_sessions: i64,
}

// ============================================
// Analytics export models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsExportRow {
    pub id: Uuid,
    pub date: String,
    pub page_visits: i64,
    pub purchase_count: i64,
    pub add_to_cart_count: i64,
    pub active_sessions: i64,
    pub cart_to_page_view_ratio: f64,
    pub conversion_rate: f64,
    pub source: String,
    pub exported_at: DateTime<Utc>,
    pub external_attempted: bool,
    pub external_success: bool,
    pub external_status_code: Option<i32>,
    pub external_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpsertAnalyticsExport {
    pub date: String,
    pub page_visits: i64,
    pub purchase_count: i64,
    pub add_to_cart_count: i64,
    pub active_sessions: i64,
    pub cart_to_page_view_ratio: f64,
    pub conversion_rate: f64,
    pub source: String,
    pub external_attempted: bool,
    pub external_success: bool,
    pub external_status_code: Option<i32>,
    pub external_message: Option<String>,
}
