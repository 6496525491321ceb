// Daily KPI merge and conversion ratio math
//
// Storage runs three independent grouped aggregations over the 30-day
// window; this module folds them into one record per date and computes
// the funnel ratios. Dates appear only when at least one source mentions
// them (sparse union of active dates, no zero-filled calendar).

use std::collections::HashMap;

use crate::types::{ConversionMetrics, DailyKpi};

/// Per-date counts from the page_view/purchase event aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDailyCounts {
    /// UTC `YYYY-MM-DD`.
    pub date: String,
    pub page_visits: i64,
    pub purchase_count: i64,
}

/// Per-date count from a single-category aggregation (add_to_cart events
/// or sessions started).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCount {
    pub date: String,
    pub count: i64,
}

/// Merge the three grouped aggregations by date key.
///
/// The event aggregation seeds each record; add_to_cart and session
/// counts either fill in their field on an existing record or insert a
/// fresh record with the other fields at 0. Output is sorted by date
/// string descending (correct for `YYYY-MM-DD`).
pub fn merge_daily_kpis(
    events: Vec<EventDailyCounts>,
    add_to_cart: Vec<DateCount>,
    sessions: Vec<DateCount>,
) -> Vec<DailyKpi> {
    let mut by_date: HashMap<String, DailyKpi> = HashMap::new();

    for item in events {
        by_date.insert(
            item.date.clone(),
            DailyKpi {
                date: item.date,
                page_visits: item.page_visits,
                purchase_count: item.purchase_count,
                add_to_cart_count: 0,
                active_sessions: 0,
            },
        );
    }

    for item in add_to_cart {
        by_date
            .entry(item.date.clone())
            .or_insert_with(|| DailyKpi::zeroed(item.date))
            .add_to_cart_count = item.count;
    }

    for item in sessions {
        by_date
            .entry(item.date.clone())
            .or_insert_with(|| DailyKpi::zeroed(item.date))
            .active_sessions = item.count;
    }

    let mut merged: Vec<DailyKpi> = by_date.into_values().collect();
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}

/// Percentage with 2-decimal precision: scale by 10000, round to the
/// nearest integer (ties away from zero), divide by 100. 0 when the
/// denominator is 0 so a dead funnel never yields NaN/Infinity.
fn ratio_percent(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64 * 10000.0).round() / 100.0
    } else {
        0.0
    }
}

/// Funnel ratios from the three window counts.
pub fn conversion_metrics(page_views: i64, add_to_cart: i64, purchases: i64) -> ConversionMetrics {
    ConversionMetrics {
        cart_to_page_view_ratio: ratio_percent(add_to_cart, page_views),
        conversion_rate: ratio_percent(purchases, add_to_cart),
    }
}

/// Round to 2 decimal places (session analytics averages).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(date: &str, page_visits: i64, purchases: i64) -> EventDailyCounts {
        EventDailyCounts {
            date: date.to_string(),
            page_visits,
            purchase_count: purchases,
        }
    }

    fn count(date: &str, n: i64) -> DateCount {
        DateCount {
            date: date.to_string(),
            count: n,
        }
    }

    #[test]
    fn merges_three_sources_sorted_descending() {
        let merged = merge_daily_kpis(
            vec![events("2024-01-01", 1, 1)],
            vec![count("2024-01-02", 1)],
            vec![count("2024-01-01", 1)],
        );

        assert_eq!(
            merged,
            vec![
                DailyKpi {
                    date: "2024-01-02".into(),
                    page_visits: 0,
                    purchase_count: 0,
                    add_to_cart_count: 1,
                    active_sessions: 0,
                },
                DailyKpi {
                    date: "2024-01-01".into(),
                    page_visits: 1,
                    purchase_count: 1,
                    add_to_cart_count: 0,
                    active_sessions: 1,
                },
            ]
        );
    }

    #[test]
    fn cart_only_date_still_appears_with_zeros() {
        let merged = merge_daily_kpis(vec![], vec![count("2024-03-15", 4)], vec![]);
        assert_eq!(
            merged,
            vec![DailyKpi {
                date: "2024-03-15".into(),
                page_visits: 0,
                purchase_count: 0,
                add_to_cart_count: 4,
                active_sessions: 0,
            }]
        );
    }

    #[test]
    fn session_only_date_inserts_record() {
        let merged = merge_daily_kpis(vec![], vec![], vec![count("2024-03-16", 2)]);
        assert_eq!(merged[0].active_sessions, 2);
        assert_eq!(merged[0].page_visits, 0);
    }

    #[test]
    fn no_activity_anywhere_yields_empty_output() {
        assert!(merge_daily_kpis(vec![], vec![], vec![]).is_empty());
    }

    #[test]
    fn one_record_per_date_with_all_fields_filled() {
        let merged = merge_daily_kpis(
            vec![events("2024-05-01", 10, 2)],
            vec![count("2024-05-01", 5)],
            vec![count("2024-05-01", 7)],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0],
            DailyKpi {
                date: "2024-05-01".into(),
                page_visits: 10,
                purchase_count: 2,
                add_to_cart_count: 5,
                active_sessions: 7,
            }
        );
    }

    #[test]
    fn conversion_ratios_round_to_two_decimals() {
        // 3 add-to-cart over 7 page views -> 42.857...% -> 42.86
        let m = conversion_metrics(7, 3, 1);
        assert_eq!(m.cart_to_page_view_ratio, 42.86);
        // 1 purchase over 3 carts -> 33.333...% -> 33.33
        assert_eq!(m.conversion_rate, 33.33);
    }

    #[test]
    fn zero_denominators_yield_zero_not_nan() {
        let m = conversion_metrics(0, 0, 5);
        assert_eq!(
            m,
            ConversionMetrics {
                cart_to_page_view_ratio: 0.0,
                conversion_rate: 0.0,
            }
        );

        // Purchases without page views: cart ratio 0, conversion still computed.
        let m = conversion_metrics(0, 2, 1);
        assert_eq!(m.cart_to_page_view_ratio, 0.0);
        assert_eq!(m.conversion_rate, 50.0);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(4.567), 4.57);
        assert_eq!(round2(3.994), 3.99);
        assert_eq!(round2(4.0), 4.0);
    }
}
