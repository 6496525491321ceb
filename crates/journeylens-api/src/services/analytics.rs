// Analytics service: KPI window queries + pure merge/ratio math

use chrono::{Duration, Utc};
use journeylens_core::{
    conversion_metrics, kpi::round2, merge_daily_kpis, AnalyticsError, ConversionMetrics,
    DailyKpi, DateCount, EventDailyCounts, PageVisits, SessionAnalytics, UserAnalytics,
};
use journeylens_storage::Database;
use std::sync::Arc;

const TOP_PAGES_LIMIT: i64 = 10;

pub struct AnalyticsService {
    db: Arc<Database>,
}

impl AnalyticsService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Per-day KPIs over the rolling 30-day window, newest date first.
    pub async fn daily_kpis(&self) -> Result<Vec<DailyKpi>, AnalyticsError> {
        let now = Utc::now();
        let window_start = now - Duration::days(super::ANALYTICS_WINDOW_DAYS);

        let (events, add_to_cart, sessions) = tokio::try_join!(
            self.db.event_daily_counts(window_start, now),
            self.db.add_to_cart_daily_counts(window_start, now),
            self.db.session_daily_counts(window_start, now),
        )?;

        let events = events
            .into_iter()
            .map(|r| EventDailyCounts {
                date: r.date,
                page_visits: r.page_visits,
                purchase_count: r.purchase_count,
            })
            .collect();
        let add_to_cart = add_to_cart
            .into_iter()
            .map(|r| DateCount {
                date: r.date,
                count: r.count,
            })
            .collect();
        let sessions = sessions
            .into_iter()
            .map(|r| DateCount {
                date: r.date,
                count: r.count,
            })
            .collect();

        Ok(merge_daily_kpis(events, add_to_cart, sessions))
    }

    /// Funnel ratios over the 30-day window.
    pub async fn conversion_metrics(&self) -> Result<ConversionMetrics, AnalyticsError> {
        let window_start = Utc::now() - Duration::days(super::ANALYTICS_WINDOW_DAYS);

        let (page_views, add_to_cart, purchases) = tokio::try_join!(
            self.db.count_events_by_type_since("page_view", window_start),
            self.db.count_events_by_type_since("add_to_cart", window_start),
            self.db.count_events_by_type_since("purchase", window_start),
        )?;

        Ok(conversion_metrics(page_views, add_to_cart, purchases))
    }

    pub async fn user_analytics(&self) -> Result<UserAnalytics, AnalyticsError> {
        let window_start = Utc::now() - Duration::days(super::ANALYTICS_WINDOW_DAYS);

        let (total_users, new_users) = tokio::try_join!(
            self.db.count_users(),
            self.db.count_users_created_since(window_start),
        )?;

        Ok(UserAnalytics {
            total_users,
            new_users,
            returning_users: total_users - new_users,
        })
    }

    /// Averages over ALL sessions (no window); zeros when none exist.
    pub async fn session_analytics(&self) -> Result<SessionAnalytics, AnalyticsError> {
        let stats = self.db.session_stats().await?;

        Ok(SessionAnalytics {
            average_session_duration: stats.average_session_duration.unwrap_or(0.0).round()
                as i64,
            average_pages_per_session: round2(stats.average_pages_per_session.unwrap_or(0.0)),
            total_sessions: stats.total_sessions,
        })
    }

    /// All-time top 10 pages by page_view count.
    pub async fn top_pages(&self) -> Result<Vec<PageVisits>, AnalyticsError> {
        let rows = self.db.top_pages(TOP_PAGES_LIMIT).await?;
        Ok(rows
            .into_iter()
            .map(|r| PageVisits {
                page: r.page,
                visits: r.visits,
            })
            .collect())
    }
}
