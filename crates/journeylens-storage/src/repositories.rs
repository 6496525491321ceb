// Repository layer for database operations
//
// Aggregations run as grouped SQL over the events/sessions tables; the
// cross-source merge and ratio math live in journeylens-core. Dates are
// grouped on UTC calendar days formatted YYYY-MM-DD.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL. Connection-level timeouts
    /// only; queries are not retried.
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.name)
        .bind(&input.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_users(&self) -> Result<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_users_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ============================================
    // Sessions
    // ============================================

    pub async fn create_session(&self, input: CreateSession) -> Result<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (id, user_id, session_start, session_end, pages_visited, time_spent)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6)
            RETURNING id, user_id, session_start, session_end, pages_visited, time_spent, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(input.session_start)
        .bind(input.session_end)
        .bind(input.pages_visited)
        .bind(input.time_spent)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<Option<SessionRow>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, session_start, session_end, pages_visited, time_spent, created_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_sessions(&self, limit: i64, offset: i64) -> Result<Vec<SessionRow>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, session_start, session_end, pages_visited, time_spent, created_at
            FROM sessions
            ORDER BY session_start DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All sessions for one user, unbounded. Feeds the behavior
    /// reconstruction path, which filters in memory.
    pub async fn sessions_for_user(&self, user_id: Uuid) -> Result<Vec<SessionRow>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, session_start, session_end, pages_visited, time_spent, created_at
            FROM sessions
            WHERE user_id = $1
            ORDER BY session_start DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Single aggregate over all sessions, no date window.
    pub async fn session_stats(&self) -> Result<SessionStatsRow> {
        let row = sqlx::query_as::<_, SessionStatsRow>(
            r#"
            SELECT
                AVG(time_spent)::float8 AS average_session_duration,
                AVG(pages_visited)::float8 AS average_pages_per_session,
                COUNT(*) AS total_sessions
            FROM sessions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Sessions started in the window, grouped by UTC calendar date.
    pub async fn session_daily_counts(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateCountRow>> {
        let rows = sqlx::query_as::<_, DateCountRow>(
            r#"
            SELECT
                to_char(session_start AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                COUNT(*) AS count
            FROM sessions
            WHERE session_start >= $1 AND session_start <= $2
            GROUP BY 1
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, NOW()), $10)
            RETURNING id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(input.session_id)
        .bind(&input.event_type)
        .bind(&input.page)
        .bind(&input.item_id)
        .bind(input.duration)
        .bind(input.purchase_count)
        .bind(input.timestamp)
        .bind(input.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self, limit: i64, offset: i64) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata
            FROM events
            ORDER BY timestamp DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All events for one user, unbounded. Feeds the behavior
    /// reconstruction path, which filters in memory.
    pub async fn events_for_user(&self, user_id: Uuid) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata
            FROM events
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_events_by_session(
        &self,
        session_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, user_id, session_id, event_type, page, item_id, duration, purchase_count, timestamp, metadata
            FROM events
            WHERE session_id = $1
            ORDER BY timestamp DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(session_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// page_view/purchase events in the window, grouped by UTC date with
    /// per-type conditional counts.
    pub async fn event_daily_counts(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EventDailyCountsRow>> {
        let rows = sqlx::query_as::<_, EventDailyCountsRow>(
            r#"
            SELECT
                to_char(timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                COUNT(*) FILTER (WHERE event_type = 'page_view') AS page_visits,
                COUNT(*) FILTER (WHERE event_type = 'purchase') AS purchase_count
            FROM events
            WHERE event_type IN ('page_view', 'purchase')
              AND timestamp >= $1 AND timestamp <= $2
            GROUP BY 1
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// add_to_cart events in the window, grouped by UTC date.
    pub async fn add_to_cart_daily_counts(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DateCountRow>> {
        let rows = sqlx::query_as::<_, DateCountRow>(
            r#"
            SELECT
                to_char(timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                COUNT(*) AS count
            FROM events
            WHERE event_type = 'add_to_cart'
              AND timestamp >= $1 AND timestamp <= $2
            GROUP BY 1
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total events of one type since the window start (lower bound only,
    /// matching the conversion counts).
    pub async fn count_events_by_type_since(
        &self,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM events
            WHERE event_type = $1 AND timestamp >= $2
            "#,
        )
        .bind(event_type)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// All-time page_view counts for pages that exist, top N by visits.
    pub async fn top_pages(&self, limit: i64) -> Result<Vec<PageVisitsRow>> {
        let rows = sqlx::query_as::<_, PageVisitsRow>(
            r#"
            SELECT page, COUNT(*) AS visits
            FROM events
            WHERE event_type = 'page_view' AND page IS NOT NULL
            GROUP BY page
            ORDER BY visits DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Applicants
    // ============================================

    pub async fn create_applicant(&self, input: CreateApplicant) -> Result<ApplicantRow> {
        let row = sqlx::query_as::<_, ApplicantRow>(
            r#"
            INSERT INTO applicants (id, user_id, session_id, action_type, item_id, status, timestamp)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'completed'), COALESCE($7, NOW()))
            RETURNING id, user_id, session_id, action_type, item_id, status, timestamp
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.user_id)
        .bind(input.session_id)
        .bind(&input.action_type)
        .bind(&input.item_id)
        .bind(&input.status)
        .bind(input.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_applicant(&self, id: Uuid) -> Result<Option<ApplicantRow>> {
        let row = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, user_id, session_id, action_type, item_id, status, timestamp
            FROM applicants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_applicants(&self, filter: &ApplicantFilter) -> Result<Vec<ApplicantRow>> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, user_id, session_id, action_type, item_id, status, timestamp
            FROM applicants
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR session_id = $2)
              AND ($3::text IS NULL OR action_type = $3)
              AND ($4::text IS NULL OR status = $4)
              AND ($5::timestamptz IS NULL OR timestamp >= $5)
              AND ($6::timestamptz IS NULL OR timestamp <= $6)
            ORDER BY timestamp DESC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.session_id)
        .bind(&filter.action_type)
        .bind(&filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn applicants_for_user(&self, user_id: Uuid) -> Result<Vec<ApplicantRow>> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, user_id, session_id, action_type, item_id, status, timestamp
            FROM applicants
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Analytics exports
    // ============================================

    /// Upsert one day's snapshot, keyed by date. Re-running the export for
    /// a date overwrites the previous snapshot.
    pub async fn upsert_analytics_export(
        &self,
        input: UpsertAnalyticsExport,
    ) -> Result<AnalyticsExportRow> {
        let row = sqlx::query_as::<_, AnalyticsExportRow>(
            r#"
            INSERT INTO analytics_exports (
                id, date, page_visits, purchase_count, add_to_cart_count, active_sessions,
                cart_to_page_view_ratio, conversion_rate, source, exported_at,
                external_attempted, external_success, external_status_code, external_message
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), $10, $11, $12, $13)
            ON CONFLICT (date) DO UPDATE SET
                page_visits = EXCLUDED.page_visits,
                purchase_count = EXCLUDED.purchase_count,
                add_to_cart_count = EXCLUDED.add_to_cart_count,
                active_sessions = EXCLUDED.active_sessions,
                cart_to_page_view_ratio = EXCLUDED.cart_to_page_view_ratio,
                conversion_rate = EXCLUDED.conversion_rate,
                source = EXCLUDED.source,
                exported_at = NOW(),
                external_attempted = EXCLUDED.external_attempted,
                external_success = EXCLUDED.external_success,
                external_status_code = EXCLUDED.external_status_code,
                external_message = EXCLUDED.external_message
            RETURNING id, date, page_visits, purchase_count, add_to_cart_count, active_sessions,
                cart_to_page_view_ratio, conversion_rate, source, exported_at,
                external_attempted, external_success, external_status_code, external_message
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.date)
        .bind(input.page_visits)
        .bind(input.purchase_count)
        .bind(input.add_to_cart_count)
        .bind(input.active_sessions)
        .bind(input.cart_to_page_view_ratio)
        .bind(input.conversion_rate)
        .bind(&input.source)
        .bind(input.external_attempted)
        .bind(input.external_success)
        .bind(input.external_status_code)
        .bind(&input.external_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_analytics_export(&self, date: &str) -> Result<Option<AnalyticsExportRow>> {
        let row = sqlx::query_as::<_, AnalyticsExportRow>(
            r#"
            SELECT id, date, page_visits, purchase_count, add_to_cart_count, active_sessions,
                cart_to_page_view_ratio, conversion_rate, source, exported_at,
                external_attempted, external_success, external_status_code, external_message
            FROM analytics_exports
            WHERE date = $1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
