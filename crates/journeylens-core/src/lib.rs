// Core analytics domain
//
// Pure data-shaping logic shared by the API server and the export job:
// - kpi: per-day KPI merge and conversion ratio math
// - behavior: single-user journey reconstruction
// - validate: input and date-range validation
//
// No I/O happens here. Callers fetch rows from storage and hand them in.

pub mod behavior;
pub mod error;
pub mod kpi;
pub mod types;
pub mod validate;

pub use behavior::{reconstruct_behavior, BehaviorWindow, EVENT_TIMELINE_LIMIT, SESSION_TIMELINE_LIMIT};
pub use error::AnalyticsError;
pub use kpi::{conversion_metrics, merge_daily_kpis, DateCount, EventDailyCounts};
pub use types::*;
