// Domain entities and derived analytics types
//
// Entities mirror the stored collections (events, sessions, users,
// applicants). Derived types are pure functions of those facts at query
// time and are never the source of truth.
//
// JSON uses camelCase to match the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Kind of user interaction recorded by the tracking client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    Purchase,
    AddToCart,
    Click,
    FormSubmit,
    VideoPlay,
    Error,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::Purchase => "purchase",
            EventType::AddToCart => "add_to_cart",
            EventType::Click => "click",
            EventType::FormSubmit => "form_submit",
            EventType::VideoPlay => "video_play",
            EventType::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "page_view" => Some(EventType::PageView),
            "purchase" => Some(EventType::Purchase),
            "add_to_cart" => Some(EventType::AddToCart),
            "click" => Some(EventType::Click),
            "form_submit" => Some(EventType::FormSubmit),
            "video_play" => Some(EventType::VideoPlay),
            "error" => Some(EventType::Error),
            _ => None,
        }
    }
}

// Stored values are CHECK-constrained to the known set; anything else is
// treated as a generic error event.
impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        EventType::parse(s).unwrap_or(EventType::Error)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded user interaction. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Page URL or identifier.
    pub page: Option<String>,
    /// Item/product ID.
    pub item_id: Option<String>,
    /// Seconds spent on the interaction.
    pub duration: i32,
    pub purchase_count: i32,
    pub timestamp: DateTime<Utc>,
    /// Extra dynamic attributes.
    pub metadata: Option<serde_json::Value>,
}

/// One browsing session. Created once, read-only for aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_start: DateTime<Utc>,
    pub session_end: Option<DateTime<Utc>>,
    pub pages_visited: i32,
    /// Seconds.
    pub time_spent: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// An applicant action (apply/save/withdraw flows tracked alongside events).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub action_type: String,
    pub item_id: Option<String>,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================
// Derived analytics types
// ============================================

/// One day's KPI counts. `date` is a UTC `YYYY-MM-DD` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyKpi {
    pub date: String,
    pub page_visits: i64,
    pub purchase_count: i64,
    pub add_to_cart_count: i64,
    pub active_sessions: i64,
}

impl DailyKpi {
    /// All-zero record for a date. Used when merging partial aggregations
    /// and as the export fallback when no activity exists.
    pub fn zeroed(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            page_visits: 0,
            purchase_count: 0,
            add_to_cart_count: 0,
            active_sessions: 0,
        }
    }
}

/// Funnel ratios over the 30-day window, as percentages with 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetrics {
    pub cart_to_page_view_ratio: f64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub total_users: i64,
    /// Users created within the 30-day window.
    pub new_users: i64,
    pub returning_users: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SessionAnalytics {
    /// Seconds, rounded to the nearest integer.
    pub average_session_duration: i64,
    /// Rounded to 2 decimals.
    pub average_pages_per_session: f64,
    pub total_sessions: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageVisits {
    pub page: String,
    pub visits: i64,
}

// ============================================
// Behavior reconstruction types
// ============================================

/// Events grouped under one page key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageActivity {
    pub page: String,
    pub page_views: i64,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSummary {
    pub total_sessions: i64,
    pub total_events: i64,
    /// Sum of session.timeSpent, seconds.
    pub total_time_spent: i64,
    /// Sum of session.pagesVisited.
    pub total_pages_visited: i64,
    pub purchase_count: i64,
    /// 0 when the user has no sessions in range.
    pub average_time_per_session: f64,
    pub average_pages_per_session: f64,
}

/// Full journey reconstruction for one user, optionally date-filtered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserBehavior {
    pub user: User,
    pub summary: BehaviorSummary,
    pub events_by_page: Vec<PageActivity>,
    /// Sessions by start descending, capped at 20.
    pub session_timeline: Vec<Session>,
    /// Events by timestamp descending, capped at 50.
    pub event_timeline: Vec<Event>,
}

// ============================================
// Export types
// ============================================

/// Delivery status of the optional external forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExternalExportStatus {
    pub attempted: bool,
    pub success: bool,
    pub status_code: Option<u16>,
    pub message: Option<String>,
}

/// One day's persisted analytics snapshot, upserted by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsExport {
    pub date: String,
    pub kpis: DailyKpi,
    pub conversion: ConversionMetrics,
    pub source: String,
    pub exported_at: DateTime<Utc>,
    pub external_export_status: Option<ExternalExportStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_round_trips_through_str() {
        for t in [
            EventType::PageView,
            EventType::Purchase,
            EventType::AddToCart,
            EventType::Click,
            EventType::FormSubmit,
            EventType::VideoPlay,
            EventType::Error,
        ] {
            assert_eq!(EventType::parse(t.as_str()), Some(t));
        }
        assert_eq!(EventType::parse("scroll"), None);
    }

    #[test]
    fn daily_kpi_serializes_camel_case() {
        let kpi = DailyKpi::zeroed("2024-01-01");
        let json = serde_json::to_value(&kpi).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["pageVisits"], 0);
        assert_eq!(json["addToCartCount"], 0);
        assert_eq!(json["activeSessions"], 0);
    }
}
