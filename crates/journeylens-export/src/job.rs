// Daily analytics export
//
// Computes the KPI + conversion snapshot, persists it to
// analytics_exports (fatal on failure), and optionally forwards it to an
// external endpoint (non-fatal; delivery status is recorded in the row).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use journeylens_core::{
    conversion_metrics, merge_daily_kpis, ConversionMetrics, DailyKpi, DateCount,
    EventDailyCounts, ExternalExportStatus,
};
use journeylens_storage::{Database, UpsertAnalyticsExport};
use serde_json::json;

pub const EXPORT_SOURCE: &str = "journeylens-export";
const ANALYTICS_WINDOW_DAYS: i64 = 30;

/// External forwarding settings, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct ExportConfig {
    pub target_url: Option<String>,
    pub api_key: Option<String>,
}

impl ExportConfig {
    pub fn from_env() -> Self {
        Self {
            target_url: std::env::var("EXPORT_TARGET_URL").ok().filter(|s| !s.is_empty()),
            api_key: std::env::var("EXPORT_TARGET_API_KEY").ok().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug)]
pub struct ExportOutcome {
    pub date: String,
    pub external: Option<ExternalExportStatus>,
}

/// Run one export cycle. Returns Err only when the snapshot could not be
/// computed or persisted locally.
pub async fn export_daily_analytics(
    db: &Database,
    config: &ExportConfig,
) -> Result<ExportOutcome> {
    let now = Utc::now();
    let window_start = now - Duration::days(ANALYTICS_WINDOW_DAYS);

    let (events, add_to_cart, sessions) = tokio::try_join!(
        db.event_daily_counts(window_start, now),
        db.add_to_cart_daily_counts(window_start, now),
        db.session_daily_counts(window_start, now),
    )
    .context("Failed to run KPI aggregations")?;

    let kpis = merge_daily_kpis(
        events
            .into_iter()
            .map(|r| EventDailyCounts {
                date: r.date,
                page_visits: r.page_visits,
                purchase_count: r.purchase_count,
            })
            .collect(),
        add_to_cart
            .into_iter()
            .map(|r| DateCount {
                date: r.date,
                count: r.count,
            })
            .collect(),
        sessions
            .into_iter()
            .map(|r| DateCount {
                date: r.date,
                count: r.count,
            })
            .collect(),
    );

    let (page_views, carts, purchases) = tokio::try_join!(
        db.count_events_by_type_since("page_view", window_start),
        db.count_events_by_type_since("add_to_cart", window_start),
        db.count_events_by_type_since("purchase", window_start),
    )
    .context("Failed to run conversion counts")?;
    let conversion = conversion_metrics(page_views, carts, purchases);

    let date = yesterday_utc_date();
    let kpi_for_day = pick_kpi_for_date(&kpis, &date);

    let external = match &config.target_url {
        Some(url) => {
            tracing::info!(target_url = %url, date = %date, "Exporting daily analytics");
            Some(forward_snapshot(url, config.api_key.as_deref(), &date, &kpi_for_day, &conversion).await)
        }
        None => {
            tracing::warn!("EXPORT_TARGET_URL not set; skipping external forward");
            None
        }
    };

    if let Some(status) = &external {
        if status.success {
            tracing::info!(status_code = ?status.status_code, "Daily analytics export forwarded");
        } else {
            tracing::error!(
                status_code = ?status.status_code,
                message = ?status.message,
                "Daily analytics export forward failed"
            );
        }
    }

    let ext = external.clone().unwrap_or_default();
    db.upsert_analytics_export(UpsertAnalyticsExport {
        date: date.clone(),
        page_visits: kpi_for_day.page_visits,
        purchase_count: kpi_for_day.purchase_count,
        add_to_cart_count: kpi_for_day.add_to_cart_count,
        active_sessions: kpi_for_day.active_sessions,
        cart_to_page_view_ratio: conversion.cart_to_page_view_ratio,
        conversion_rate: conversion.conversion_rate,
        source: EXPORT_SOURCE.to_string(),
        external_attempted: ext.attempted,
        external_success: ext.success,
        external_status_code: ext.status_code.map(i32::from),
        external_message: ext.message,
    })
    .await
    .context("Failed to persist analytics export")?;

    Ok(ExportOutcome { date, external })
}

/// Yesterday's UTC calendar date as YYYY-MM-DD.
fn yesterday_utc_date() -> String {
    (Utc::now() - Duration::days(1)).format("%Y-%m-%d").to_string()
}

/// The record for the export date; falls back to the newest record, then
/// to an all-zero snapshot when there was no activity at all.
fn pick_kpi_for_date(kpis: &[DailyKpi], date: &str) -> DailyKpi {
    kpis.iter()
        .find(|k| k.date == date)
        .or_else(|| kpis.first())
        .cloned()
        .unwrap_or_else(|| DailyKpi::zeroed(date))
}

/// POST the snapshot to the external endpoint. Never returns Err; any
/// failure comes back as a non-success status.
async fn forward_snapshot(
    target_url: &str,
    api_key: Option<&str>,
    date: &str,
    kpis: &DailyKpi,
    conversion: &ConversionMetrics,
) -> ExternalExportStatus {
    let payload = json!({
        "date": date,
        "kpis": kpis,
        "conversion": conversion,
        "source": EXPORT_SOURCE,
        "exportedAt": Utc::now().to_rfc3339(),
    });

    let client = reqwest::Client::new();
    let mut request = client.post(target_url).json(&payload);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    match request.send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            let success = response.status().is_success();
            let message = response.text().await.ok();
            ExternalExportStatus {
                attempted: true,
                success,
                status_code: Some(status_code),
                message,
            }
        }
        Err(err) => {
            tracing::error!(error = %err, "Export HTTP error");
            ExternalExportStatus {
                attempted: true,
                success: false,
                status_code: None,
                message: Some(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_exact_date_when_present() {
        let kpis = vec![
            DailyKpi::zeroed("2024-01-03"),
            DailyKpi {
                date: "2024-01-02".into(),
                page_visits: 7,
                purchase_count: 1,
                add_to_cart_count: 2,
                active_sessions: 3,
            },
        ];
        let picked = pick_kpi_for_date(&kpis, "2024-01-02");
        assert_eq!(picked.page_visits, 7);
    }

    #[test]
    fn falls_back_to_newest_then_zeroed() {
        let kpis = vec![DailyKpi {
            date: "2024-01-03".into(),
            page_visits: 9,
            purchase_count: 0,
            add_to_cart_count: 0,
            active_sessions: 0,
        }];
        let picked = pick_kpi_for_date(&kpis, "2023-12-31");
        assert_eq!(picked.date, "2024-01-03");
        assert_eq!(picked.page_visits, 9);

        let picked = pick_kpi_for_date(&[], "2023-12-31");
        assert_eq!(picked, DailyKpi::zeroed("2023-12-31"));
    }

    #[test]
    fn yesterday_is_well_formed() {
        let date = yesterday_utc_date();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
